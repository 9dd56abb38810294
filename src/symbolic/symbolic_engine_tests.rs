//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::parse_expr::parse_native;
    use crate::symbolic::parse_latex::{normalize_exponential, parse_latex};
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    fn both(native: &str, latex: &str) -> (Expr, Expr) {
        (
            parse_native(native).unwrap(),
            parse_latex(&normalize_exponential(latex)).unwrap(),
        )
    }

    #[test]
    fn test_front_ends_build_the_same_tree() {
        let pairs = [
            ("x**2 + 2*x + 1", "x^2 + 2x + 1"),
            ("np.sin(x)/x", r"\frac{\sin(x)}{x}"),
            ("math.exp(-x)", "e^{-x}"),
            ("sqrt(x)", r"\sqrt{x}"),
            ("abs(x - 1)", "|x - 1|"),
            ("log(x)", r"\ln x"),
            ("x*cos(x)", r"x \cos(x)"),
        ];
        for (native, latex) in pairs {
            let (a, b) = both(native, latex);
            assert_eq!(a, b, "{} vs {}", native, latex);
        }
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        assert_eq!(parse_native("x**2 - 1").unwrap().to_string(), "((x ^ 2) - 1)");
        assert_eq!(parse_native("-x").unwrap().to_string(), "(-1 * x)");
        assert_eq!(parse_latex(r"\sin x").unwrap().to_string(), "sin(x)");
    }

    #[test]
    fn test_compiled_and_folded_values_agree() {
        let expr = parse_latex(r"\frac{x^3 - \cos(x)}{1 + |x|} + \sqrt[3]{x+9}").unwrap();
        let f = expr.lambdify1D("x").unwrap();
        for x in [-2.0, -0.5, 0.0, 0.75, 3.0] {
            assert_relative_eq!(
                f(x),
                expr.substitute_and_evaluate("x", x).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_symbol_bookkeeping() {
        let expr = parse_native("x*y + z/x").unwrap();
        assert_eq!(
            expr.all_arguments_are_variables(),
            vec!["x".to_string(), "y".to_string(), "z".to_string()]
        );
        assert!(expr.contains_variable("z"));
        assert_eq!(expr.foreign_variable("x"), Some("y".to_string()));
        let substituted = expr.set_variable("x", 2.0);
        assert!(!substituted.contains_variable("x"));
    }
}
