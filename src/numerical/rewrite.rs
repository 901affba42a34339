//! Isolation of a variable: moves everything that does not contain it to the other side of
//! the equation, one layer of the expression at a time.
use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::{Expr, FuncName};
use num::{One, Signed};

fn is_sqrt_of(term: &Expr, var: &str) -> bool {
    matches!(term, Expr::Func { name: FuncName::sqrt, .. }) && term.contains_var(var)
}

/// sqrt(u)^p as u^(p/2)
pub fn unwrap_sqrt(expr: &Expr) -> Expr {
    match expr {
        Expr::Func {
            name: FuncName::sqrt,
            args,
            power,
            mult,
        } => args[0].powr(&(power / crate::symbolic::utils::rat_int(2))).scale(mult),
        _ => expr.clone(),
    }
}

fn cannot(what: &str, expr: &Expr) -> SolveError {
    SolveError::CannotIsolate(format!("{}: {}", what, expr))
}

/// rewrites `expr = other` so that the returned left side is the innermost part holding `var`:
/// a function call, a bare power of the variable or a sum whose every term contains it
pub fn rewrite(
    expr: &Expr,
    other: &Expr,
    var: &str,
    depth: usize,
    max_depth: usize,
) -> Result<(Expr, Expr), SolveError> {
    if depth > max_depth {
        return Err(SolveError::DepthExceeded(depth));
    }
    let mut lhs = expr.clone();
    let mut rhs = other.clone();

    if lhs.is_sum() {
        // a single square root: move the rest over and square both sides
        let (sqrts, rest): (Vec<Expr>, Vec<Expr>) =
            lhs.terms().into_iter().partition(|t| is_sqrt_of(t, var));
        if sqrts.len() == 1 {
            rhs = rhs.minus(&Expr::sum_from_terms(rest)).powi(2).expand();
            lhs = sqrts[0].powi(2).expand();
        }
    } else {
        lhs = unwrap_sqrt(&lhs.expand());
    }

    if !lhs.contains_var(var) {
        return Err(cannot("variable vanished while isolating", expr));
    }

    if lhs.is_sum() {
        let (with, without): (Vec<Expr>, Vec<Expr>) =
            lhs.terms().into_iter().partition(|t| t.contains_var(var));
        let moved = !without.is_empty();
        rhs = rhs.minus(&Expr::sum_from_terms(without));
        let isolated = Expr::sum_from_terms(with);
        return if moved {
            rewrite(&isolated, &rhs, var, depth + 1, max_depth)
        } else {
            Ok((isolated, rhs))
        };
    }

    if let Expr::Product { factors, mult } = &lhs {
        let mut m = mult.clone();
        if m.is_negative() {
            m = -m;
            rhs = rhs.negate();
        }
        if rhs.is_zero() {
            return Err(cannot("product equal to zero", &lhs));
        }
        let (with, without): (Vec<Expr>, Vec<Expr>) =
            factors.iter().cloned().partition(|f| f.contains_var(var));
        if without.is_empty() && m.is_one() {
            return Err(cannot("nothing to move out of", &lhs));
        }
        rhs = rhs
            .divide(&Expr::product_from_factors(without))
            .scale(&m.recip());
        let isolated = Expr::product_from_factors(with);
        return rewrite(&isolated, &rhs, var, depth + 1, max_depth);
    }

    let m = lhs.mult();
    if !m.is_one() {
        rhs = rhs.scale(&m.recip());
        lhs = lhs.unit();
    }

    let p = lhs.power();
    if !p.is_one() {
        let inverse = p.recip();
        let raised = lhs.powr(&inverse);
        let other_raised = rhs.expand().powr(&inverse);
        return rewrite(&raised, &other_raised, var, depth + 1, max_depth);
    }

    match &lhs {
        Expr::Exponential { base, exponent, .. } => {
            if !exponent.contains_var(var) {
                let other_side = rhs.pow_expr(&exponent.powi(-1));
                rewrite(base, &other_side, var, depth + 1, max_depth)
            } else if !base.contains_var(var) {
                let other_side = Expr::log_of(&rhs).divide(&Expr::log_of(base));
                rewrite(exponent, &other_side, var, depth + 1, max_depth)
            } else {
                Err(cannot("variable in both base and exponent", &lhs))
            }
        }
        Expr::Func { .. } | Expr::Var { .. } | Expr::Sum { .. } => Ok((lhs, rhs)),
        _ => Err(cannot("unsupported shape", &lhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    fn iso(s: &str) -> (String, String) {
        let (l, r) = rewrite(&p(s), &Expr::c(0), "x", 0, 24).unwrap();
        (l.to_string(), r.to_string())
    }

    #[test]
    fn test_sum_and_product() {
        assert_eq!(iso("2*sin(x)-y"), ("sin(x)".to_string(), "1/2*y".to_string()));
        assert_eq!(iso("a*log(x)+b"), ("log(x)".to_string(), p("-b/a").to_string()));
    }

    #[test]
    fn test_powers() {
        let (l, r) = rewrite(&p("x^2"), &p("y"), "x", 0, 24).unwrap();
        assert_eq!(l, p("x"));
        assert_eq!(r, p("y^(1/2)"));
        let (l, r) = rewrite(&p("(x+1)^(1/3)"), &p("2"), "x", 0, 24).unwrap();
        assert_eq!(l, p("x"));
        assert_eq!(r, Expr::c(7));
        // integer powers of sums are expanded, not inverted
        let (l, r) = rewrite(&p("(x+1)^2"), &p("4"), "x", 0, 24).unwrap();
        assert_eq!(l, p("x^2+2*x"));
        assert_eq!(r, Expr::c(3));
    }

    #[test]
    fn test_square_root() {
        let (l, r) = rewrite(&p("sqrt(x+a)-b"), &Expr::c(0), "x", 0, 24).unwrap();
        assert_eq!(l, p("x"));
        assert_eq!(r, p("b^2-a"));
    }

    #[test]
    fn test_exponential() {
        let (l, r) = rewrite(&p("e^(2*x)"), &p("y"), "x", 0, 24).unwrap();
        assert_eq!(l, p("x"));
        assert_eq!(r, p("log(y)/2"));
        let (l, r) = rewrite(&p("x^y"), &p("3"), "x", 0, 24).unwrap();
        assert_eq!(l, p("x"));
        assert_eq!(r, p("3^(1/y)"));
    }

    #[test]
    fn test_failures() {
        assert!(rewrite(&p("x*sin(x)"), &Expr::c(0), "x", 0, 24).is_err());
        assert!(rewrite(&p("x^x"), &Expr::c(2), "x", 0, 24).is_err());
        assert!(matches!(
            rewrite(&p("sin(x)"), &Expr::c(0), "x", 30, 24),
            Err(SolveError::DepthExceeded(_))
        ));
    }
}
