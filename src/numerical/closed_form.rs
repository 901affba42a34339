//! Closed-form roots of polynomials up to the fourth degree with arbitrary symbolic
//! coefficients, and the n complex roots of a binomial `a*x^n + b`.
//!
//! Coefficients are passed lowest degree first, the way [`Expr::coeffs`] returns them.
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::rat;
use num_complex::Complex64;
use std::collections::HashMap;

/// numeric value with every free variable bound to one
fn eval_with_ones(expr: &Expr) -> Option<Complex64> {
    let bindings: HashMap<String, Complex64> = expr
        .variables()
        .into_iter()
        .map(|v| (v, Complex64::new(1.0, 0.0)))
        .collect();
    expr.eval_complex(&bindings).ok()
}

fn vanishes(expr: &Expr) -> bool {
    expr.is_zero() || eval_with_ones(expr).is_some_and(|z| z.norm() < 1e-12)
}

fn sqrt3() -> Expr {
    Expr::c(3).powr(&rat(1, 2))
}

/// root of c0 + c1*x
pub fn linear(c0: &Expr, c1: &Expr) -> Expr {
    c0.negate().divide(c1)
}

/// both roots of c0 + c1*x + c2*x^2, complex ones included
pub fn quadratic(c: &Expr, b: &Expr, a: &Expr) -> Vec<Expr> {
    let discriminant = b.powi(2).minus(&Expr::c(4).times(a).times(c)).expand();
    let root = discriminant.powr(&rat(1, 2));
    let two_a = Expr::c(2).times(a);
    vec![
        b.negate().plus(&root).divide(&two_a).expand(),
        b.negate().minus(&root).divide(&two_a).expand(),
    ]
}

/// Cardano's formula for d + c*x + b*x^2 + a*x^3
pub fn cubic(d: &Expr, c: &Expr, b: &Expr, a: &Expr) -> Vec<Expr> {
    let d0 = b.powi(2).minus(&Expr::c(3).times(a).times(c)).expand();
    let d1 = Expr::sum_from_terms(vec![
        Expr::c(2).times(&b.powi(3)),
        Expr::c(-9).times(a).times(b).times(c),
        Expr::c(27).times(&a.powi(2)).times(d),
    ])
    .expand();
    let q = d1
        .powi(2)
        .minus(&Expr::c(4).times(&d0.powi(3)))
        .expand()
        .powr(&rat(1, 2));
    let mut cc = q.plus(&d1).scale(&rat(1, 2)).powr(&rat(1, 3));
    if vanishes(&d0) && vanishes(&cc) {
        // the other sign of Q keeps C away from zero
        cc = q.negate().plus(&d1).scale(&rat(1, 2)).powr(&rat(1, 3));
    }
    let three_a = Expr::c(3).times(a);
    let six_a = Expr::c(6).times(a);
    let shift = b.negate().divide(&three_a);
    let i_sqrt3 = Expr::i().times(&sqrt3());
    let plus_rot = Expr::c(1).plus(&i_sqrt3);
    let minus_rot = Expr::c(1).minus(&i_sqrt3);
    let d0_over_c = d0.divide(&cc);

    let x1 = shift
        .minus(&cc.divide(&three_a))
        .minus(&d0_over_c.divide(&three_a));
    let x2 = shift
        .plus(&cc.times(&plus_rot).divide(&six_a))
        .plus(&minus_rot.times(&d0_over_c).divide(&six_a));
    let x3 = shift
        .plus(&cc.times(&minus_rot).divide(&six_a))
        .plus(&plus_rot.times(&d0_over_c).divide(&six_a));
    vec![x1.expand(), x2.expand(), x3.expand()]
}

/// Ferrari-style resolvent for e + d*x + c*x^2 + b*x^3 + a*x^4
pub fn quartic(e: &Expr, d: &Expr, c: &Expr, b: &Expr, a: &Expr) -> Vec<Expr> {
    let p = Expr::c(8)
        .times(a)
        .times(c)
        .minus(&Expr::c(3).times(&b.powi(2)))
        .divide(&Expr::c(8).times(&a.powi(2)))
        .expand();
    let q = Expr::sum_from_terms(vec![
        b.powi(3),
        Expr::c(-4).times(a).times(b).times(c),
        Expr::c(8).times(&a.powi(2)).times(d),
    ])
    .divide(&Expr::c(8).times(&a.powi(3)))
    .expand();
    let delta0 = Expr::sum_from_terms(vec![
        c.powi(2),
        Expr::c(-3).times(b).times(d),
        Expr::c(12).times(a).times(e),
    ])
    .expand();
    let delta1 = Expr::sum_from_terms(vec![
        Expr::c(2).times(&c.powi(3)),
        Expr::c(-9).times(b).times(c).times(d),
        Expr::c(27).times(&b.powi(2)).times(e),
        Expr::c(27).times(a).times(&d.powi(2)),
        Expr::c(-72).times(a).times(c).times(e),
    ])
    .expand();
    let root = delta1
        .powi(2)
        .minus(&Expr::c(4).times(&delta0.powi(3)))
        .expand()
        .powr(&rat(1, 2));
    let big_q = delta1.plus(&root).scale(&rat(1, 2)).powr(&rat(1, 3));
    let inner = p
        .scale(&rat(-2, 3))
        .plus(&big_q.plus(&delta0.divide(&big_q)).divide(&Expr::c(3).times(a)))
        .expand();
    let s = inner.powr(&rat(1, 2)).scale(&rat(1, 2));

    let shift = b.negate().divide(&Expr::c(4).times(a));
    let base = Expr::c(-4).times(&s.powi(2)).minus(&p.scale(&rat(2, 1)));
    let q_over_s = q.divide(&s);
    let first = base.plus(&q_over_s).expand().powr(&rat(1, 2)).scale(&rat(1, 2));
    let second = base.minus(&q_over_s).expand().powr(&rat(1, 2)).scale(&rat(1, 2));
    vec![
        shift.minus(&s).plus(&first).expand(),
        shift.minus(&s).minus(&first).expand(),
        shift.plus(&s).plus(&second).expand(),
        shift.plus(&s).minus(&second).expand(),
    ]
}

/// the n roots of a*x^n + b: (-b/a)^(1/n) * e^(2*pi*i*k/n)
pub fn csolve(a: &Expr, b: &Expr, n: usize) -> Vec<Expr> {
    if n == 0 {
        return Vec::new();
    }
    let modulus = b.negate().divide(a).powr(&rat(1, n as i64));
    (0..n)
        .map(|k| {
            let angle = Expr::frac(2 * k as i64, n as i64)
                .times(&Expr::pi())
                .times(&Expr::i());
            modulus.times(&Expr::exp_of(&angle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn p(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    fn poly_value(coeffs: &[i64], z: Complex64) -> Complex64 {
        coeffs
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c as f64)
    }

    fn assert_roots(coeffs: &[i64], roots: &[Expr]) {
        let scale = coeffs.iter().map(|c| c.abs() as f64).fold(1.0, f64::max);
        for root in roots {
            let z = root.eval_constant().unwrap();
            let tolerance = 1e-6 * scale * (1.0 + z.norm()).powi(coeffs.len() as i32 - 1);
            let value = poly_value(coeffs, z);
            assert!(
                value.norm() < tolerance,
                "coeffs {:?}: root {} = {} gives {}",
                coeffs,
                root,
                z,
                value
            );
        }
    }

    #[test]
    fn test_linear() {
        assert_eq!(linear(&p("b"), &p("a")), p("-b/a"));
        assert_eq!(linear(&Expr::c(6), &Expr::c(-3)), Expr::c(2));
    }

    #[test]
    fn test_quadratic_exact() {
        let roots = quadratic(&Expr::c(-2), &Expr::c(0), &Expr::c(1));
        assert_eq!(roots, vec![p("2^(1/2)"), p("-2^(1/2)")]);
        let roots = quadratic(&Expr::c(1), &Expr::c(0), &Expr::c(1));
        assert_eq!(roots, vec![Expr::i(), p("-i")]);
    }

    #[test]
    fn test_quadratic_symbolic() {
        // x^2 - a = 0
        let roots = quadratic(&p("-a"), &Expr::c(0), &Expr::c(1));
        assert_eq!(roots.len(), 2);
        let bindings: HashMap<String, Complex64> =
            [("a".to_string(), Complex64::new(9.0, 0.0))].into_iter().collect();
        let values: Vec<f64> = roots
            .iter()
            .map(|r| r.eval_complex(&bindings).unwrap().re)
            .collect();
        assert_relative_eq!(values[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_known_roots() {
        // (x-1)(x-2)(x-3)
        let roots = cubic(&Expr::c(-6), &Expr::c(11), &Expr::c(-6), &Expr::c(1));
        assert_roots(&[-6, 11, -6, 1], &roots);
        let mut re: Vec<f64> = roots.iter().map(|r| r.eval_constant().unwrap().re).collect();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(re[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(re[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(re[2], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_zero_c_fallback() {
        // x^3 - 3x^2 + 3x - 2 has D0 = 0 and a negative D1
        let roots = cubic(&Expr::c(-2), &Expr::c(3), &Expr::c(-3), &Expr::c(1));
        assert_roots(&[-2, 3, -3, 1], &roots);
    }

    #[test]
    fn test_cubic_random_coefficients() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..12 {
            let a: i64 = rng.random_range(1..=4);
            let b: i64 = rng.random_range(-5..=5);
            let c: i64 = rng.random_range(-5..=5);
            let d: i64 = rng.random_range(-5..=5);
            let d0 = b * b - 3 * a * c;
            let d1 = 2 * b * b * b - 9 * a * b * c + 27 * a * a * d;
            if d0 == 0 && d1 == 0 {
                // triple root, C is zero for both signs of Q
                continue;
            }
            let roots = cubic(&Expr::c(d), &Expr::c(c), &Expr::c(b), &Expr::c(a));
            assert_roots(&[d, c, b, a], &roots);
        }
    }

    #[test]
    fn test_quartic_random_coefficients() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut checked = 0;
        for _ in 0..20 {
            let a: i64 = rng.random_range(1..=3);
            let b: i64 = rng.random_range(-4..=4);
            let c: i64 = rng.random_range(-4..=4);
            let d: i64 = rng.random_range(-4..=4);
            let e: i64 = rng.random_range(-4..=4);
            let delta0 = c * c - 3 * b * d + 12 * a * e;
            if delta0 == 0 {
                continue;
            }
            let roots = quartic(&Expr::c(e), &Expr::c(d), &Expr::c(c), &Expr::c(b), &Expr::c(a));
            let values: Vec<Complex64> = roots
                .iter()
                .filter_map(|r| r.eval_constant().ok())
                .collect();
            if values.len() != 4 || values.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
                // S vanished for this choice of roots
                continue;
            }
            assert_roots(&[e, d, c, b, a], &roots);
            checked += 1;
        }
        assert!(checked >= 5);
    }

    #[test]
    fn test_quartic_biquadratic() {
        // x^4 - 5x^2 + 4 = (x-1)(x+1)(x-2)(x+2)
        let roots = quartic(&Expr::c(4), &Expr::c(0), &Expr::c(-5), &Expr::c(0), &Expr::c(1));
        assert_roots(&[4, 0, -5, 0, 1], &roots);
    }

    #[test]
    fn test_csolve() {
        // x^3 - 8 = 0
        let roots = csolve(&Expr::c(1), &Expr::c(-8), 3);
        assert_eq!(roots[0], Expr::c(2));
        assert_roots(&[-8, 0, 0, 1], &roots);
        assert!(csolve(&Expr::c(1), &Expr::c(1), 0).is_empty());
    }
}
