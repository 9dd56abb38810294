//! # Symbolic Expression Simplification Module
//!
//! Numeric simplification of expression trees, used after a variable has been replaced by
//! a literal value:
//!
//! 1. **Constant Folding**: arithmetic and elementary functions of constants are evaluated
//! 2. **Algebraic Identities**: `0 * f = 0`, `f - f = 0`, `f / f = 1`, `f + 0 = f`, `f * 1 = f`,
//!    `f ^ 0 = 1`, `f ^ 1 = f`
//!
//! The identities let a tree that still holds foreign symbols collapse to a number when
//! those symbols cancel out, e.g. `x + 0*y` at `x = 2`.

use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Evaluates all arithmetic operations and functions applied to constants, then applies the
    /// additive and multiplicative identities on what is left.
    ///
    /// ## Examples
    ///
    /// - `Const(2) + Const(3)` → `Const(5)`
    /// - `sin(Const(0))` → `Const(0)`
    /// - `Const(0) * y` → `Const(0)`
    /// - `y - y` → `Const(0)`
    pub fn simplify_numbers(&self) -> Expr {
        let folded = self.map_children(|child| child.simplify_numbers());
        match folded {
            Expr::Add(lhs, rhs) => match (*lhs, *rhs) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                (Expr::Const(a), other) | (other, Expr::Const(a)) if a == 0.0 => other,
                (lhs, rhs) => Expr::Add(lhs.boxed(), rhs.boxed()),
            },
            Expr::Sub(lhs, rhs) => match (*lhs, *rhs) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                (other, Expr::Const(b)) if b == 0.0 => other,
                (lhs, rhs) if lhs == rhs => Expr::Const(0.0),
                (lhs, rhs) => Expr::Sub(lhs.boxed(), rhs.boxed()),
            },
            Expr::Mul(lhs, rhs) => match (*lhs, *rhs) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                (Expr::Const(a), _) | (_, Expr::Const(a)) if a == 0.0 => Expr::Const(0.0),
                (Expr::Const(a), other) | (other, Expr::Const(a)) if a == 1.0 => other,
                (lhs, rhs) => Expr::Mul(lhs.boxed(), rhs.boxed()),
            },
            Expr::Div(lhs, rhs) => match (*lhs, *rhs) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a / b),
                (other, Expr::Const(b)) if b == 1.0 => other,
                (lhs, rhs) if lhs == rhs => Expr::Const(1.0),
                (lhs, rhs) => Expr::Div(lhs.boxed(), rhs.boxed()),
            },
            Expr::Pow(base, exp) => match (*base, *exp) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(real_pow(a, b)),
                (_, Expr::Const(b)) if b == 0.0 => Expr::Const(1.0),
                (other, Expr::Const(b)) if b == 1.0 => other,
                (base, exp) => Expr::Pow(base.boxed(), exp.boxed()),
            },
            Expr::Exp(inner) => fold_unary(*inner, Expr::Exp, f64::exp),
            Expr::Ln(inner) => fold_unary(*inner, Expr::Ln, f64::ln),
            Expr::Abs(inner) => fold_unary(*inner, Expr::Abs, f64::abs),
            Expr::sin(inner) => fold_unary(*inner, Expr::sin, f64::sin),
            Expr::cos(inner) => fold_unary(*inner, Expr::cos, f64::cos),
            Expr::tg(inner) => fold_unary(*inner, Expr::tg, f64::tan),
            Expr::ctg(inner) => fold_unary(*inner, Expr::ctg, |v| 1.0 / v.tan()),
            Expr::arcsin(inner) => fold_unary(*inner, Expr::arcsin, f64::asin),
            Expr::arccos(inner) => fold_unary(*inner, Expr::arccos, f64::acos),
            Expr::arctg(inner) => fold_unary(*inner, Expr::arctg, f64::atan),
            Expr::arcctg(inner) => fold_unary(*inner, Expr::arcctg, |v| PI / 2.0 - v.atan()),
            leaf => leaf,
        }
    }

    /// Substitutes `var` by `value`, simplifies, and converts the result into a finite real.
    pub fn substitute_and_evaluate(&self, var: &str, value: f64) -> Result<f64, String> {
        match self.set_variable(var, value).simplify_numbers() {
            Expr::Const(result) if result.is_finite() => Ok(result),
            Expr::Const(result) => Err(format!(
                "expression evaluates to {} at {} = {}",
                result, var, value
            )),
            remaining => Err(format!(
                "cannot convert expression to float: {} still contains {:?}",
                remaining,
                remaining.all_arguments_are_variables()
            )),
        }
    }
}

fn fold_unary(inner: Expr, rebuild: fn(Box<Expr>) -> Expr, eval: fn(f64) -> f64) -> Expr {
    match inner {
        Expr::Const(v) => Expr::Const(eval(v)),
        other => rebuild(other.boxed()),
    }
}

fn real_pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn y() -> Expr {
        Expr::var("y")
    }

    #[test]
    fn test_constant_folding() {
        let expr = (Expr::Const(2.0) + Expr::Const(3.0)) * Expr::Const(4.0);
        assert_eq!(expr.simplify_numbers(), Expr::Const(20.0));
        let expr = Expr::sin(Expr::Const(0.0).boxed()) + Expr::Const(1.0).exp();
        assert_relative_eq!(
            match expr.simplify_numbers() {
                Expr::Const(v) => v,
                _ => f64::NAN,
            },
            std::f64::consts::E,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_identities_cancel_foreign_symbols() {
        assert_eq!((Expr::Const(0.0) * y()).simplify_numbers(), Expr::Const(0.0));
        assert_eq!((y() - y()).simplify_numbers(), Expr::Const(0.0));
        assert_eq!((y() / y()).simplify_numbers(), Expr::Const(1.0));
        assert_eq!((y() + Expr::Const(0.0)).simplify_numbers(), y());
        assert_eq!((Expr::Const(1.0) * y()).simplify_numbers(), y());
        assert_eq!(y().pow(Expr::Const(0.0)).simplify_numbers(), Expr::Const(1.0));
    }

    #[test]
    fn test_substitute_and_evaluate() {
        let expr = Expr::var("x") + Expr::Const(0.0) * y();
        assert_eq!(expr.substitute_and_evaluate("x", 2.0), Ok(2.0));
        let expr = Expr::var("x").pow(Expr::Const(3.0));
        assert_eq!(expr.substitute_and_evaluate("x", 0.5), Ok(0.125));
    }

    #[test]
    fn test_substitute_and_evaluate_failures() {
        let expr = Expr::var("x") * y();
        assert!(expr.substitute_and_evaluate("x", 2.0).is_err());
        let expr = Expr::Const(1.0) / Expr::var("x");
        let err = expr.substitute_and_evaluate("x", 0.0).unwrap_err();
        assert!(err.contains("inf"));
    }
}
