use crate::symbolic::symbolic_engine::Expr;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Closure produced by [`Expr::lambdify1D`].
pub type RealFn = Box<dyn Fn(f64) -> f64>;
/// Closure produced by [`Expr::lambdify1D_complex`].
pub type ComplexFn = Box<dyn Fn(Complex64) -> Complex64>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts a single-variable symbolic expression into an executable Rust closure over f64.
    ///
    /// The only symbol allowed in the tree is `var`; any other name makes the compilation
    /// fail with the same message an interpreter gives for an undefined name.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::var("x").pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D("x").unwrap();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Result<RealFn, String> {
        if let Some(name) = self.foreign_variable(var) {
            return Err(format!("name '{}' is not defined", name));
        }
        Ok(self.lambdify1D_unchecked(var))
    }

    fn lambdify1D_unchecked(&self, var: &str) -> RealFn {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked(var);
                let rhs_fn = rhs.lambdify1D_unchecked(var);
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked(var);
                let rhs_fn = rhs.lambdify1D_unchecked(var);
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked(var);
                let rhs_fn = rhs.lambdify1D_unchecked(var);
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked(var);
                let rhs_fn = rhs.lambdify1D_unchecked(var);
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D_unchecked(var);
                // integer exponents are exact through powi: x^3 at 0.5 is exactly 0.125
                if let Some(k) = exp.as_small_integer() {
                    Box::new(move |x| base_fn(x).powi(k))
                } else {
                    let exp_fn = exp.lambdify1D_unchecked(var);
                    Box::new(move |x| base_fn(x).powf(exp_fn(x)))
                }
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::Abs(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).abs())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::ctg(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| 1.0 / expr_fn(x).tan())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| expr_fn(x).atan())
            }
            Expr::arcctg(expr) => {
                let expr_fn = expr.lambdify1D_unchecked(var);
                Box::new(move |x| PI / 2.0 - expr_fn(x).atan())
            }
        } // end of match
    } // end of lambdify1D

    /// Same as [`Expr::lambdify1D`] but evaluated over complex numbers, so that e.g. the
    /// logarithm or an even root of a negative number yields a value instead of NaN.
    pub fn lambdify1D_complex(&self, var: &str) -> Result<ComplexFn, String> {
        if let Some(name) = self.foreign_variable(var) {
            return Err(format!("name '{}' is not defined", name));
        }
        Ok(self.lambdify1D_complex_unchecked(var))
    }

    fn lambdify1D_complex_unchecked(&self, var: &str) -> ComplexFn {
        match self {
            Expr::Var(_) => Box::new(|z| z),
            Expr::Const(val) => {
                let val = Complex64::new(*val, 0.0);
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_complex_unchecked(var);
                let rhs_fn = rhs.lambdify1D_complex_unchecked(var);
                Box::new(move |z| lhs_fn(z) + rhs_fn(z))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_complex_unchecked(var);
                let rhs_fn = rhs.lambdify1D_complex_unchecked(var);
                Box::new(move |z| lhs_fn(z) - rhs_fn(z))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_complex_unchecked(var);
                let rhs_fn = rhs.lambdify1D_complex_unchecked(var);
                Box::new(move |z| lhs_fn(z) * rhs_fn(z))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_complex_unchecked(var);
                let rhs_fn = rhs.lambdify1D_complex_unchecked(var);
                Box::new(move |z| lhs_fn(z) / rhs_fn(z))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D_complex_unchecked(var);
                if let Some(k) = exp.as_small_integer() {
                    Box::new(move |z| base_fn(z).powi(k))
                } else {
                    let exp_fn = exp.lambdify1D_complex_unchecked(var);
                    Box::new(move |z| complex_pow(base_fn(z), exp_fn(z)))
                }
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).ln())
            }
            Expr::Abs(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| Complex64::new(expr_fn(z).norm(), 0.0))
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).tan())
            }
            Expr::ctg(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).tan().inv())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| expr_fn(z).atan())
            }
            Expr::arcctg(expr) => {
                let expr_fn = expr.lambdify1D_complex_unchecked(var);
                Box::new(move |z| Complex64::new(PI / 2.0, 0.0) - expr_fn(z).atan())
            }
        }
    }

    /// `Some(k)` if the expression is a constant integer small enough for `powi`.
    pub fn as_small_integer(&self) -> Option<i32> {
        match self {
            Expr::Const(c) if c.fract() == 0.0 && c.abs() <= i32::MAX as f64 => Some(*c as i32),
            Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(s), inner) if *s == -1.0 => inner.as_small_integer().map(|k| -k),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Real arithmetic whenever both operands are real and the base is non-negative,
/// principal branch otherwise.
fn complex_pow(base: Complex64, exponent: Complex64) -> Complex64 {
    if base.im == 0.0 && exponent.im == 0.0 && base.re >= 0.0 {
        Complex64::new(base.re.powf(exponent.re), 0.0)
    } else {
        base.powc(exponent)
    }
}
