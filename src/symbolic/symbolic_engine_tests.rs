//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::{Expr, FuncName};
    use crate::symbolic::utils::rat;
    use approx::assert_relative_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn p(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_add_assign() {
        let mut expr = Expr::var("x");
        expr += Expr::c(2);
        assert_eq!(expr, p("x+2"));
        expr += Expr::var("x");
        assert_eq!(expr.to_string(), "2*x+2");
    }

    #[test]
    fn test_sub_assign() {
        let mut expr = Expr::var("x");
        expr -= Expr::c(2);
        assert_eq!(expr, p("x-2"));
        expr -= Expr::var("x");
        assert_eq!(expr, Expr::c(-2));
    }

    #[test]
    fn test_mul_assign() {
        let mut expr = Expr::var("x");
        expr *= Expr::c(2);
        assert_eq!(expr, p("2*x"));
        expr *= Expr::var("x");
        assert_eq!(expr.to_string(), "2*x^2");
    }

    #[test]
    fn test_operators_on_references() {
        let x = Expr::var("x");
        let y = Expr::var("y");
        assert_eq!(&x + &y, p("y+x"));
        assert_eq!(&x - &x, Expr::c(0));
        assert_eq!(&x * &y, p("y*x"));
        assert_eq!(&x / &x, Expr::c(1));
        assert_eq!(-x.clone(), p("-x"));
        assert_eq!(Expr::from(3) * x.clone(), p("3*x"));
    }

    #[test]
    fn test_symbols() {
        let vars = Expr::Symbols("x, y, z");
        assert_eq!(vars.len(), 3);
        assert_eq!(vars[2], Expr::var("z"));
        assert!(Expr::Symbols(" ,").is_empty());
    }

    #[test]
    fn test_named_constants_are_not_variables() {
        let e = p("pi*x+e^y+i*z");
        assert_eq!(e.variables(), vec!["x", "y", "z"]);
        assert!(Expr::is_constant_symbol("pi"));
        assert!(!Expr::is_constant_symbol("x"));
        assert!(p("2*pi").variables().is_empty());
    }

    #[test]
    fn test_canonical_sums() {
        // like terms merge whatever the order they were written in
        assert_eq!(p("x+y+x"), p("2*x+y"));
        assert_eq!(p("x^2+1+x"), p("1+x+x^2"));
        assert_eq!(p("x^2+1+x").to_string(), "x^2+x+1");
        // a sum with power one never carries a multiplier
        let scaled = p("3*(x+1)");
        assert_eq!(scaled.mult(), rat(1, 1));
        assert_eq!(scaled.terms().len(), 2);
    }

    #[test]
    fn test_canonical_products() {
        assert_eq!(p("x*y*x"), p("x^2*y"));
        assert_eq!(p("2*x*3"), p("6*x"));
        assert_eq!(p("x*x^(-1)"), Expr::c(1));
        assert_eq!(p("x^(1/2)*x^(1/2)"), p("x"));
    }

    #[test]
    fn test_sign_of_sums_in_products() {
        // a sum used as a factor keeps a positive leading term
        assert_eq!(p("1/(1-x)"), p("-1/(x-1)"));
        assert_eq!(p("(1-x)^2"), p("(x-1)^2"));
        assert_eq!(p("(1-x)*(x-1)").expand(), p("-(x-1)^2").expand());
    }

    #[test]
    fn test_nan_propagates() {
        let nan = p("x/0");
        assert!(nan.is_nan());
        assert!(p("x/0+1").is_nan());
        assert!(nan.times(&p("y")).is_nan());
        assert!(!p("x+1").is_nan());
    }

    #[test]
    fn test_powers_of_i() {
        assert_eq!(p("i^2"), Expr::c(-1));
        assert_eq!(p("i^3"), p("-i"));
        assert_eq!(p("i^4"), Expr::c(1));
        assert_eq!(p("i*i*i*i*i"), Expr::i());
    }

    #[test]
    fn test_substitute() {
        let e = p("x^2+2*x*y+y^2");
        assert_eq!(e.substitute("y", &Expr::c(1)), p("x^2+2*x+1"));
        assert_eq!(e.substitute("y", &p("-x")).expand(), Expr::c(0));
        let many = e.substitute_all(&[("x".to_string(), Expr::c(2)), ("y".to_string(), Expr::c(3))]);
        assert_eq!(many, Expr::c(25));
        // untouched when the variable is absent
        assert_eq!(e.substitute("z", &Expr::c(5)), e);
    }

    #[test]
    fn test_queries() {
        let e = p("sin(x)*y+log(z)");
        assert!(e.has_trig());
        assert!(e.has_log());
        assert!(e.has_func_of("x"));
        assert!(!e.has_func_of("y"));
        assert!(e.contains_var("z"));
        assert!(!e.contains_var("w"));
        assert!(p("2^x").has_exponential_of("x"));
        assert!(!p("x^2").has_exponential_of("x"));
        let mut powers = p("x^3+x^(1/2)+y*x").powers_of("x");
        powers.sort();
        assert_eq!(powers, vec![rat(1, 2), rat(1, 1), rat(3, 1)]);
    }

    #[test]
    fn test_function_names() {
        assert_eq!(FuncName::from_str("ln").unwrap(), FuncName::log);
        assert_eq!(FuncName::from_str("arctg").unwrap(), FuncName::atan);
        assert!(FuncName::sin.is_trig());
        assert!(!FuncName::log.is_trig());
        assert_eq!(FuncName::cos.to_string(), "cos");
        for name in FuncName::iter() {
            assert_eq!(FuncName::from_str(&name.to_string()).unwrap(), name);
        }
    }

    #[test]
    fn test_display_round_trip() {
        for s in [
            "-3/2*x",
            "x^(-1)",
            "(x+1)^(-1)*y",
            "e^(x+1)",
            "2*3^(1/2)",
            "sin(x)^2",
            "x^2*y-x+1",
        ] {
            let e = p(s);
            assert_eq!(p(&e.to_string()), e, "{}", s);
        }
    }

    #[test]
    fn test_exact_function_values() {
        assert_eq!(p("sin(0)"), Expr::c(0));
        assert_eq!(p("cos(0)"), Expr::c(1));
        assert_eq!(p("log(e)"), Expr::c(1));
        assert_eq!(p("log(e^(x+1))"), p("x+1"));
        assert_eq!(p("abs(-3)"), Expr::c(3));
        assert_eq!(p("abs(-x)"), p("abs(x)"));
    }

    #[test]
    fn test_numeric_agreement_after_expand() {
        let e = p("(x+2)^3*(x-1)");
        let expanded = e.expand();
        let f = e.lambdify1D("x").unwrap();
        let g = expanded.lambdify1D("x").unwrap();
        for x in [-2.5, -1.0, 0.0, 0.3, 4.0] {
            assert_relative_eq!(f(x), g(x), epsilon = 1e-9);
        }
    }
}
