use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    brackets_are_balanced, find_leftmost_char_outside_brackets, find_pair_to_this_bracket,
    find_rightmost_additive_operator, find_rightmost_operator_outside_brackets,
    is_wrapped_in_brackets,
};
use log::debug;
use std::f64::consts::{E, PI};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedNewtonCotes::symbolic::parse_expr::parse_native;
/// let parsed_expression = parse_native("x**2 + np.sin(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
//                  search recursion diagram
//                "y^2+exp(x)+log(x)/y-x^2.3"       |
//                |       left  | right             |
//                |_________________________________|
//                |           div by    -           |
//                |_________________________________|
//                |y^2+exp(x)+..| x^2.3             |
//                |       |     |          |        |
//                |_____ \|/    |          |        |
//                |           div by+      |        |
//                |________________________|________|
//                |y^2+exp(x)   | log(x)/y |        |
//                |____________Ok_________\|/_______|
//                |           div by /     |        |
//                |_______________________\|/_______|
//                |       log(x)| y                 |
//                  etc...

/// deepest recursion of the parser, counting brackets, operators and unary signs
pub const MAX_NESTING_DEPTH: usize = 512;

/// module prefixes accepted in front of function and constant names in arithmetic syntax
const MODULE_PREFIXES: [&str; 3] = ["math.", "np.", "numpy."];

fn strip_module_prefix(name: &str) -> &str {
    MODULE_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Builds the tree node for a named function applied to an already parsed argument.
pub fn apply_function(name: &str, arg: Expr) -> Result<Expr, String> {
    let arg = arg.boxed();
    let expr = match strip_module_prefix(name) {
        "exp" => Expr::Exp(arg),
        "log" | "ln" => Expr::Ln(arg),
        "log10" => Expr::Div(Expr::Ln(arg).boxed(), Expr::Ln(Expr::Const(10.0).boxed()).boxed()),
        "log2" => Expr::Div(Expr::Ln(arg).boxed(), Expr::Ln(Expr::Const(2.0).boxed()).boxed()),
        "sqrt" => Expr::Pow(arg, Expr::Const(0.5).boxed()),
        "abs" | "fabs" => Expr::Abs(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "sec" => Expr::Div(Expr::Const(1.0).boxed(), Expr::cos(arg).boxed()),
        "csc" => Expr::Div(Expr::Const(1.0).boxed(), Expr::sin(arg).boxed()),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        other => return Err(format!("name '{}' is not defined", other)),
    };
    Ok(expr)
}

/// Named constants; `None` means the identifier is a free symbol.
fn named_constant(name: &str) -> Option<f64> {
    match strip_module_prefix(name) {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

/// Parses an expression in canonical syntax: `+ - * / ^`, brackets, function calls,
/// numbers, constants and variables. `^` is the power operator here.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    parse_nested(input, 0)
}

fn parse_nested(input: &str, depth: usize) -> Result<Expr, String> {
    if depth > MAX_NESTING_DEPTH {
        return Err("expression nested too deeply".to_string());
    }
    let input = input.trim();
    debug!("parsing: {}", input);
    if input.is_empty() {
        return Err("empty expression or operand".to_string());
    }
    if !brackets_are_balanced(input) {
        return Err(format!("unbalanced brackets in '{}'", input));
    }

    // whole expression in brackets
    if is_wrapped_in_brackets(input) {
        return parse_nested(&input[1..input.len() - 1], depth + 1);
    }

    // addition and subtraction, left associative
    if let Some((pos, op)) = find_rightmost_additive_operator(input) {
        let left = parse_nested(&input[..pos], depth + 1)?;
        let right = parse_nested(&input[pos + 1..], depth + 1)?;
        return Ok(match op {
            '+' => left + right,
            _ => left - right,
        });
    }

    // multiplication and division, left associative
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/']) {
        let left = parse_nested(&input[..pos], depth + 1)?;
        let right = parse_nested(&input[pos + 1..], depth + 1)?;
        return Ok(match op {
            '*' => left * right,
            _ => left / right,
        });
    }

    // unary signs bind weaker than powers: -x^2 == -(x^2)
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(-parse_nested(rest, depth + 1)?);
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_nested(rest, depth + 1);
    }

    // power, right associative
    if let Some(pos) = find_leftmost_char_outside_brackets(input, '^') {
        let base = parse_nested(&input[..pos], depth + 1)?;
        let exponent = parse_nested(&input[pos + 1..], depth + 1)?;
        return Ok(base.pow(exponent));
    }

    // function call: name(argument)
    if let Some(open) = input.find('(') {
        let name = input[..open].trim();
        let is_call = find_pair_to_this_bracket(input, open) == Some(input.len() - 1);
        let dotted_name = name
            .split('.')
            .all(|part| is_identifier(part));
        if is_call && dotted_name && !name.is_empty() {
            let inner = &input[open + 1..input.len() - 1];
            if find_rightmost_operator_outside_brackets(inner, &[',']).is_some() {
                return Err(format!("{}() takes exactly one argument", name));
            }
            return apply_function(name, parse_nested(inner, depth + 1)?);
        }
        return Err(format!("invalid syntax near '{}'", input));
    }

    // constants and variables
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return input
            .parse::<f64>()
            .map(Expr::Const)
            .map_err(|_| format!("invalid number literal '{}'", input));
    }
    if let Some(value) = named_constant(input) {
        return Ok(Expr::Const(value));
    }
    if is_identifier(input) {
        return Ok(Expr::Var(input.to_string()));
    }
    Err(format!("invalid syntax near '{}'", input))
}

/// Parses the arithmetic ("python") syntax: `**` is the power operator and `^` is refused,
/// the way an interpreter would refuse bitwise xor on floats.
pub fn parse_native(input: &str) -> Result<Expr, String> {
    if input.contains('^') {
        return Err("unsupported operator '^' for real numbers, use '**' for powers".to_string());
    }
    if input.contains("***") {
        return Err(format!("invalid syntax near '{}'", input.trim()));
    }
    parse_expression_func(&input.replace("**", "^"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_func("1.5e-3").unwrap(), Expr::Const(1.5e-3));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_expression_func("x").unwrap(), x());
    }

    #[test]
    fn test_parse_subtraction_is_left_associative() {
        let result = parse_expression_func("x^2 - x - 1").unwrap();
        let expected = x().pow(Expr::Const(2.0)) - x() - Expr::Const(1.0);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_division_is_left_associative() {
        let result = parse_expression_func("x / 2 / 4").unwrap();
        assert_eq!(result, x() / Expr::Const(2.0) / Expr::Const(4.0));
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let result = parse_expression_func("2^3^x").unwrap();
        assert_eq!(
            result,
            Expr::Const(2.0).pow(Expr::Const(3.0).pow(x()))
        );
    }

    #[test]
    fn test_unary_minus_binds_weaker_than_power() {
        let result = parse_expression_func("-x^2").unwrap();
        assert_eq!(result, -(x().pow(Expr::Const(2.0))));
        let result = parse_expression_func("2*-x").unwrap();
        assert_eq!(result, Expr::Const(2.0) * -x());
    }

    #[test]
    fn test_parse_brackets() {
        let result = parse_expression_func("(x + 1) * (x - 1)").unwrap();
        assert_eq!(
            result,
            (x() + Expr::Const(1.0)) * (x() - Expr::Const(1.0))
        );
    }

    #[test]
    fn test_parse_functions_and_prefixes() {
        assert_eq!(
            parse_native("np.sin(x)").unwrap(),
            Expr::sin(x().boxed())
        );
        assert_eq!(
            parse_native("math.exp(2*x)").unwrap(),
            Expr::Exp((Expr::Const(2.0) * x()).boxed())
        );
        assert_eq!(
            parse_native("sqrt(x)").unwrap(),
            x().pow(Expr::Const(0.5))
        );
        assert_eq!(parse_native("np.pi").unwrap(), Expr::Const(PI));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(parse_native(&deep), Err("expression nested too deeply".to_string()));
        let signs = format!("{}x", "-".repeat(20_000));
        assert_eq!(parse_native(&signs), Err("expression nested too deeply".to_string()));
        let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_native(&shallow).unwrap(), x());
        let sum = vec!["x"; 100].join(" + ");
        assert!(parse_native(&sum).is_ok());
    }

    #[test]
    fn test_native_power_operator() {
        assert_eq!(parse_native("x**3").unwrap(), x().pow(Expr::Const(3.0)));
        assert_eq!(
            parse_native("x**-1").unwrap(),
            x().pow(-Expr::Const(1.0))
        );
        assert!(parse_native("x^3").is_err());
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(parse_expression_func("(x +").is_err());
        assert!(parse_expression_func("(x + y").is_err());
        assert!(parse_expression_func("x +").is_err());
        assert!(parse_expression_func("2x").is_err());
        assert!(parse_expression_func("").is_err());
        assert!(parse_native("foo(x)").is_err());
        assert!(parse_native("pow(x, 2)").is_err());
        assert!(parse_native("x***2").is_err());
    }

    #[test]
    fn test_unknown_names_are_kept_as_symbols() {
        // rejected later, when the tree is compiled for one variable
        assert_eq!(parse_native("y").unwrap(), Expr::Var("y".to_string()));
    }
}
