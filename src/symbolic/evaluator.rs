//! # Expression evaluator
//!
//! Turns the text of `f(x)` plus its input format into values of `f` at given abscissas.
//!
//! * [`InputFormat::Native`] - arithmetic syntax (`x**2 + np.sin(x)`), parsed and compiled
//!   once, then evaluated directly.
//! * [`InputFormat::MarkupMath`] - LaTeX syntax, evaluated through an ordered list of
//!   strategies, the first success wins:
//!   1. `e^{..}` is rewritten to `\exp{..}` before anything else,
//!   2. the tree is compiled over complex numbers and evaluated; a result with an imaginary
//!      part below the tolerance gives its real part, otherwise its modulus,
//!   3. `x` is substituted by its value in the tree and the tree is folded to a number,
//!   4. the text is parsed again after a lenient clean-up and step 3 is repeated.
//!
//!   When every strategy fails the error carries the reason of the last one.
//!
//! Parsing and compilation are done once per [`ExpressionEvaluator`]; every call to
//! [`ExpressionEvaluator::eval`] gives the same value as a fresh [`evaluate`] call.

use crate::symbolic::parse_expr::parse_native;
use crate::symbolic::parse_latex::{normalize_exponential, parse_latex, relax_latex};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::{ComplexFn, RealFn};
use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// name of the free variable of every function
pub const VARIABLE: &str = "x";
/// imaginary parts below this magnitude are treated as rounding noise
pub const IMAGINARY_TOLERANCE: f64 = 1e-10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum InputFormat {
    #[serde(rename = "python")]
    #[strum(serialize = "python")]
    Native,
    #[serde(rename = "latex")]
    #[strum(serialize = "latex")]
    MarkupMath,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("the function is missing")]
    EmptyExpression,
    #[error("invalid expression: {0}")]
    Parse(String),
    #[error("error evaluating the function: {0}")]
    Evaluation(String),
    #[error("could not evaluate the LaTeX expression: {0}")]
    Latex(String),
}

enum Prepared {
    Native(Result<RealFn, EvalError>),
    Latex(LatexPipeline),
}

struct LatexPipeline {
    normalized: String,
    parsed: Result<Expr, String>,
    compiled: Result<ComplexFn, String>,
    reparsed: OnceCell<Result<Expr, String>>,
    imaginary_tolerance: f64,
}

/// A function definition ready to be evaluated at any number of abscissas.
pub struct ExpressionEvaluator {
    text: String,
    format: InputFormat,
    prepared: Prepared,
}

impl ExpressionEvaluator {
    pub fn new(text: &str, format: InputFormat) -> Result<Self, EvalError> {
        Self::with_imaginary_tolerance(text, format, IMAGINARY_TOLERANCE)
    }

    pub fn with_imaginary_tolerance(
        text: &str,
        format: InputFormat,
        imaginary_tolerance: f64,
    ) -> Result<Self, EvalError> {
        if text.trim().is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        let prepared = match format {
            InputFormat::Native => Prepared::Native(prepare_native(text)),
            InputFormat::MarkupMath => {
                let normalized = normalize_exponential(text);
                debug!("LaTeX input '{}' normalized to '{}'", text, normalized);
                let parsed = parse_latex(&normalized);
                let compiled = match &parsed {
                    Ok(expr) => expr.lambdify1D_complex(VARIABLE),
                    Err(reason) => Err(reason.clone()),
                };
                Prepared::Latex(LatexPipeline {
                    normalized,
                    parsed,
                    compiled,
                    reparsed: OnceCell::new(),
                    imaginary_tolerance,
                })
            }
        };
        Ok(Self {
            text: text.to_string(),
            format,
            prepared,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// Value of the function at `x`.
    pub fn eval(&self, x: f64) -> Result<f64, EvalError> {
        match &self.prepared {
            Prepared::Native(compiled) => {
                let f = compiled.as_ref().map_err(Clone::clone)?;
                let value = f(x);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(EvalError::Evaluation(format!(
                        "math domain error, f({}) = {}",
                        x, value
                    )))
                }
            }
            Prepared::Latex(pipeline) => pipeline.eval(x),
        }
    }
}

fn prepare_native(text: &str) -> Result<RealFn, EvalError> {
    let expr = parse_native(text).map_err(EvalError::Parse)?;
    expr.lambdify1D(VARIABLE).map_err(EvalError::Evaluation)
}

type Strategy<'a> = (&'static str, &'a dyn Fn(f64) -> Result<f64, String>);

impl LatexPipeline {
    fn eval(&self, x: f64) -> Result<f64, EvalError> {
        let numeric = |x| self.numeric(x);
        let substitution = |x| self.substitution(x);
        let reparse = |x| self.reparse(x);
        let strategies: [Strategy; 3] = [
            ("numeric", &numeric),
            ("substitution", &substitution),
            ("re-parse", &reparse),
        ];
        let mut last_failure = String::new();
        for (name, strategy) in strategies {
            match strategy(x) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    debug!("{} strategy failed at x = {}: {}", name, x, reason);
                    last_failure = reason;
                }
            }
        }
        Err(EvalError::Latex(last_failure))
    }

    fn numeric(&self, x: f64) -> Result<f64, String> {
        let f = self.compiled.as_ref().map_err(Clone::clone)?;
        let z = f(Complex64::new(x, 0.0));
        if !(z.re.is_finite() && z.im.is_finite()) {
            return Err(format!("non-finite value {} at x = {}", z, x));
        }
        Ok(real_part_or_modulus(z, self.imaginary_tolerance))
    }

    fn substitution(&self, x: f64) -> Result<f64, String> {
        let expr = self.parsed.as_ref().map_err(Clone::clone)?;
        expr.substitute_and_evaluate(VARIABLE, x)
    }

    fn reparse(&self, x: f64) -> Result<f64, String> {
        let reparsed = self.reparsed.get_or_init(|| {
            let relaxed = relax_latex(&self.normalized);
            debug!("re-parsing relaxed LaTeX '{}'", relaxed);
            parse_latex(&relaxed)
        });
        let expr = reparsed.as_ref().map_err(Clone::clone)?;
        expr.substitute_and_evaluate(VARIABLE, x)
    }
}

/// Real part when the imaginary part is rounding noise, modulus otherwise.
pub fn real_part_or_modulus(z: Complex64, imaginary_tolerance: f64) -> f64 {
    if z.im.abs() < imaginary_tolerance {
        z.re
    } else {
        z.norm()
    }
}

/// Value of `expression` at `x`: one-shot form of [`ExpressionEvaluator`].
pub fn evaluate(expression: &str, x: f64, format: InputFormat) -> Result<f64, EvalError> {
    ExpressionEvaluator::new(expression, format)?.eval(x)
}
