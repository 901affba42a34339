//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::numerical::equation::Equation;
    use crate::numerical::linear_system::SystemSolution;
    use crate::numerical::solve::{Problem, Solution, Solver, SolutionSet, pi_multiple};
    use crate::numerical::solve_error::SolveError;
    use crate::numerical::solve_settings::SolveSettings;
    use crate::symbolic::symbolic_engine::{Expr, FuncName};
    use approx::assert_relative_eq;

    fn p(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    fn solver() -> Solver {
        Solver::new(SolveSettings::default().set_loglevel(None)).unwrap()
    }

    /// every root makes the expression vanish
    fn assert_roots_of(expr: &str, roots: &[Expr]) {
        let e = p(expr);
        for r in roots {
            let value = e.substitute("x", r).eval_constant().unwrap();
            assert!(value.norm() < 1e-9, "{} at {} gives {}", expr, r, value);
        }
    }

    #[test]
    fn test_linear() {
        let s = solver();
        assert_eq!(s.solve("a*x+b", "x").unwrap(), vec![p("-b/a")]);
        assert_eq!(s.solve("2*x+3=7", "x").unwrap(), vec![Expr::c(2)]);
        assert_eq!(s.solve("x=y+1", "x").unwrap(), vec![p("y+1")]);
    }

    #[test]
    fn test_quadratic() {
        let s = solver();
        let roots = s.solve("x^2-4", "x").unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&Expr::c(2)));
        assert!(roots.contains(&Expr::c(-2)));

        let roots = s.solve("x^2+x-1", "x").unwrap();
        assert_eq!(roots.len(), 2);
        assert_roots_of("x^2+x-1", &roots);

        let roots = s.solve("x^2+1", "x").unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&Expr::i()));
        assert!(roots.contains(&Expr::i().negate()));
    }

    #[test]
    fn test_cubic_with_integer_roots() {
        let mut roots = solver().solve("x^3-6*x^2+11*x-6", "x").unwrap();
        roots.sort_by(|a, b| a.to_f64().partial_cmp(&b.to_f64()).unwrap());
        assert_eq!(roots, vec![Expr::c(1), Expr::c(2), Expr::c(3)]);
        assert_eq!(solver().solve("x^3=0", "x").unwrap(), vec![Expr::c(0)]);
    }

    #[test]
    fn test_complex_roots_of_cubic() {
        let roots = solver().solve("x^3-2", "x").unwrap();
        assert_eq!(roots.len(), 3);
        assert_roots_of("x^3-2", &roots);
    }

    #[test]
    fn test_high_degree() {
        let roots = solver().solve("x^5-1", "x").unwrap();
        assert_eq!(roots.len(), 5);
        assert!(roots.contains(&Expr::c(1)));
        // a*x^n + b with a parameter goes through the complex roots of unity
        let roots = solver().solve("x^5-a", "x").unwrap();
        assert_eq!(roots.len(), 5);
    }

    #[test]
    fn test_trigonometric() {
        let s = solver();
        let roots = s.solve("sin(x)=0", "x").unwrap();
        assert!(roots.contains(&Expr::c(0)));
        assert!(roots.contains(&Expr::pi()));
        assert!(roots.contains(&Expr::pi().negate()));
        assert_eq!(
            s.solve("sin(x)=y", "x").unwrap(),
            vec![Expr::func(FuncName::asin, Expr::var("y"))]
        );
    }

    #[test]
    fn test_pi_snapping_can_be_switched_off() {
        let s = Solver::new(SolveSettings::default().set_loglevel(None).set_pi_conversions(false)).unwrap();
        let roots = s.solve("sin(x)=0", "x").unwrap();
        assert!(roots.contains(&Expr::c(0)));
        assert!(!roots.contains(&Expr::pi()));
        assert!(roots.iter().any(|r| (r.to_f64().unwrap() - std::f64::consts::PI).abs() < 1e-9));
    }

    #[test]
    fn test_pi_multiple() {
        let half_pi = Expr::rational(crate::symbolic::utils::f64_to_rational(std::f64::consts::FRAC_PI_2, 12).unwrap());
        assert_eq!(pi_multiple(&half_pi), Some(p("pi/2")));
        assert_eq!(pi_multiple(&Expr::c(1)), None);
        assert_eq!(pi_multiple(&Expr::c(0)), None);
    }

    #[test]
    fn test_functions_of_the_unknown() {
        let s = solver();
        let roots = s.solve("abs(x)=y", "x").unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&Expr::var("y")));
        assert!(roots.contains(&p("-y")));
        assert_eq!(s.solve("log(x)=y", "x").unwrap(), vec![Expr::exp_of(&Expr::var("y"))]);
        assert!(s.solve("sqrt(x+a)=b", "x").unwrap().contains(&p("b^2-a")));
    }

    #[test]
    fn test_exponentials() {
        let s = solver();
        let roots = s.solve("2^x=8", "x").unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0].to_f64().unwrap(), 3.0, epsilon = 1e-9);
        assert_eq!(s.solve("a*e^x=b", "x").unwrap(), vec![Expr::log_of(&p("b/a"))]);
    }

    #[test]
    fn test_fractional_powers() {
        let s = solver();
        assert_eq!(s.solve("x^(1/2)=3", "x").unwrap(), vec![Expr::c(9)]);
        // the square root is never negative
        assert!(s.solve("x^(1/2)=-3", "x").unwrap().is_empty());
    }

    #[test]
    fn test_denominators() {
        let s = solver();
        let roots = s.solve("1/(x+1)+1/x=2", "x").unwrap();
        assert_eq!(roots.len(), 2);
        assert_roots_of("2*x^2-1", &roots);
        assert!(s.solve("1/x=0", "x").unwrap().is_empty());
    }

    #[test]
    fn test_contradiction() {
        assert!(matches!(solver().solve("1=2", "x"), Err(SolveError::Contradiction(_))));
        assert!(matches!(solver().solve("x=", "x"), Ok(_)));
        assert!(matches!(solver().solve("x=1=2", "x"), Err(SolveError::Parse { .. })));
    }

    #[test]
    fn test_solving_twice_gives_the_same() {
        let s = solver();
        let first = s.solve("x^2-5*x+6", "x").unwrap();
        let second = s.solve("x^2-5*x+6", "x").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = SolveSettings::default().set_step_size(-1.0);
        assert!(matches!(Solver::new(settings), Err(SolveError::InvalidSettings(_))));
    }

    #[test]
    fn test_linear_system() {
        let solution = solver().solve_system(&["x+y=3", "x-y=1"], None).unwrap();
        assert_eq!(solution.get("x"), Some(&Expr::c(2)));
        assert_eq!(solution.get("y"), Some(&Expr::c(1)));
        assert!(matches!(solution, SystemSolution::Pairs(_)));
    }

    #[test]
    fn test_singular_system() {
        assert_eq!(
            solver().solve_system(&["x+y=1", "2*x+2*y=2"], None),
            Err(SolveError::SingularSystem(
                "System does not have a distinct solution".to_string()
            ))
        );
    }

    #[test]
    fn test_system_with_parameters() {
        let solution = solver()
            .solve_system(&["a*x+y=b", "x=y"], Some(&["x", "y"]))
            .unwrap();
        assert_eq!(solution.get("x"), Some(&p("b/(a+1)")));
    }

    #[test]
    fn test_nonlinear_system() {
        let solution = solver().solve_system(&["x^2+y^2=1", "x=y"], None).unwrap();
        assert_eq!(solution.len(), 2);
        let x = solution.get("x").unwrap().to_f64().unwrap();
        let y = solution.get("y").unwrap().to_f64().unwrap();
        assert_relative_eq!(x.abs(), 0.5_f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(x, y, epsilon = 1e-10);
    }

    #[test]
    fn test_nonlinear_system_without_real_solution() {
        let settings = SolveSettings::default()
            .set_loglevel(None)
            .set_non_linear(4, 10, 10.0, 0.01);
        let s = Solver::new(settings).unwrap();
        let solution = s.solve_system(&["x^2+y^2=-1", "x=y"], None).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_solutions_as_object() {
        let s = Solver::new(SolveSettings::default().set_loglevel(None).set_solutions_as_object(true)).unwrap();
        let solution = s.solve_system(&["x+y=3", "x-y=1"], None).unwrap();
        assert!(matches!(solution, SystemSolution::Map(_)));
        assert_eq!(solution.get("y"), Some(&Expr::c(1)));
    }

    #[test]
    fn test_problem_variants() {
        let s = solver();
        let equation = Equation::parse("2*x=4").unwrap();
        assert_eq!(
            s.solve_problem(&Problem::Equation(equation), &[]).unwrap(),
            Solution::Values(vec![Expr::c(2)])
        );
        assert_eq!(
            s.solve_problem(&Problem::Expression(p("y-3")), &["y"]).unwrap(),
            Solution::Values(vec![Expr::c(3)])
        );
        let system = vec![Equation::parse("x+y=3").unwrap(), Equation::parse("x-y=1").unwrap()];
        let Solution::System(solution) = s.solve_problem(&Problem::System(system), &[]).unwrap() else {
            panic!("expected a system solution");
        };
        assert_eq!(solution.get("x"), Some(&Expr::c(2)));
    }

    #[test]
    fn test_quartic_factors_without_real_roots() {
        let s = solver();
        let roots = s.solve("x^4+1", "x").unwrap();
        assert_eq!(roots.len(), 4);
        assert_roots_of("x^4+1", &roots);

        let roots = s.solve("x^6-1", "x").unwrap();
        assert_eq!(roots.len(), 6);
        assert!(roots.contains(&Expr::c(1)));
        assert!(roots.contains(&Expr::c(-1)));
        assert_roots_of("x^6-1", &roots);

        let roots = s.solve("x^5+x", "x").unwrap();
        assert_eq!(roots.len(), 5);
        assert!(roots.contains(&Expr::c(0)));
        assert_roots_of("x^5+x", &roots);
    }

    #[test]
    fn test_huge_power() {
        let roots = solver().solve("x^9223372036854775807=1", "x").unwrap();
        assert!(roots.contains(&Expr::c(1)));
    }

    #[test]
    fn test_undefined_values_are_dropped() {
        let s = solver();
        assert!(s.solve("1/0=x", "x").unwrap().is_empty());
        assert!(s.solve("log(0)=x", "x").unwrap().is_empty());
        assert!(s.solve("e^x=0", "x").unwrap().is_empty());
        assert_eq!(s.solve("log(1)=x", "x").unwrap(), vec![Expr::c(0)]);
    }

    #[test]
    fn test_solution_set() {
        let mut set = SolutionSet::new();
        assert!(set.add(Expr::c(1)));
        assert!(!set.add(Expr::c(1)));
        assert!(!set.add(Expr::nan()));
        assert!(set.add(p("y+1")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec(), vec![Expr::c(1), p("y+1")]);
    }
}
