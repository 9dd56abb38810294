#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedNewtonCotes::symbolic::parse_expr::parse_native;
/// let input = "x**2 + math.exp(x)";
/// let parsed_expression = parse_native(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let f = parsed_expression.lambdify1D("x").unwrap();
/// println!("{}, Rust function: {}  \n", input, f(1.0));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # LaTeX front end
/// the same symbolic expression built from LaTeX math
///# Example#
/// ```
/// use RustedNewtonCotes::symbolic::parse_latex::parse_latex;
/// let expr = parse_latex(r"\frac{1}{1+x^2}").unwrap();
/// assert_eq!(expr.substitute_and_evaluate("x", 1.0), Ok(0.5));
/// ```
pub mod parse_latex;
/// ________________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree, its printing and symbol bookkeeping
pub mod symbolic_engine;
mod symbolic_engine_tests;
/// symbolic expression into a Rust closure, over f64 or over complex numbers
pub mod symbolic_lambdify;
/// constant folding and substitution of the variable by a value
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// # Expression evaluator
/// value of f(x) for the "python" and "latex" input formats
/// Example#
/// ```
/// use RustedNewtonCotes::symbolic::evaluator::{evaluate, InputFormat};
/// assert_eq!(evaluate("x**2", 3.0, InputFormat::Native), Ok(9.0));
/// assert_eq!(evaluate(r"\frac{x}{2}", 3.0, InputFormat::MarkupMath), Ok(1.5));
/// ```
pub mod evaluator;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
