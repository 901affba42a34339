//! Polynomial view of expressions: coefficient extraction, exact factoring over the
//! rationals and numeric roots of polynomials with rational coefficients.
use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{Rational, f64_to_rational, rat_to_f64, rat_to_i64};
use nalgebra::{DMatrix, Schur};
use num::{BigInt, Integer, One, ToPrimitive, Zero};
use log::debug;
use num_complex::Complex64;

/// divisor enumeration above this is skipped
const MAX_DIVISOR_SEARCH: i64 = 10_000_000;
const POLISH_ITERATIONS: usize = 50;
/// higher powers of the unknown are not treated as polynomials
pub const MAX_POLYNOMIAL_DEGREE: usize = 512;
/// QR sweeps allowed for the companion matrix before switching to Durand-Kerner
const SCHUR_MAX_ITERATIONS: usize = 1000;
const DURAND_KERNER_ITERATIONS: usize = 2000;

impl Expr {
    /// coefficients `[c0, c1, ..., cn]` of the expression seen as a polynomial in `var`,
    /// with `cn` non-zero. Fails when `var` occurs anywhere but in non-negative integer powers
    /// or the degree is above [`MAX_POLYNOMIAL_DEGREE`].
    pub fn coeffs(&self, var: &str) -> Result<Vec<Expr>, SolveError> {
        let expanded = self.expand();
        let not_polynomial = || SolveError::NotPolynomial {
            expr: self.to_string(),
            var: var.to_string(),
        };
        let mut out: Vec<Expr> = vec![Expr::c(0)];
        for term in expanded.terms() {
            let (degree, coefficient) = term_degree(&term, var)
                .filter(|(degree, _)| *degree <= MAX_POLYNOMIAL_DEGREE)
                .ok_or_else(not_polynomial)?;
            if out.len() <= degree {
                out.resize(degree + 1, Expr::c(0));
            }
            out[degree] = out[degree].plus(&coefficient);
        }
        while out.len() > 1 && out.last().is_some_and(|c| c.is_zero()) {
            out.pop();
        }
        Ok(out)
    }

    pub fn is_polynomial_in(&self, var: &str) -> bool {
        self.coeffs(var).is_ok()
    }

    /// polynomial degree in `var`, None when not a polynomial
    pub fn degree_in(&self, var: &str) -> Option<usize> {
        self.coeffs(var).ok().map(|c| c.len() - 1)
    }
}

/// degree and coefficient of one expanded term
fn term_degree(term: &Expr, var: &str) -> Option<(usize, Expr)> {
    if !term.contains_var(var) {
        return Some((0, term.clone()));
    }
    match term {
        Expr::Var { name, power, mult } if name == var => {
            let k = rat_to_i64(power).filter(|k| *k >= 0)?;
            Some((usize::try_from(k).ok()?, Expr::Const(mult.clone())))
        }
        Expr::Product { factors, mult } => {
            let mut degree = None;
            let mut rest = Vec::with_capacity(factors.len());
            for f in factors {
                if !f.contains_var(var) {
                    rest.push(f.clone());
                    continue;
                }
                match f {
                    Expr::Var { name, power, .. } if name == var && degree.is_none() => {
                        let k = rat_to_i64(power).filter(|k| *k >= 0)?;
                        degree = Some(usize::try_from(k).ok()?);
                    }
                    _ => return None,
                }
            }
            rest.push(Expr::Const(mult.clone()));
            Some((degree?, Expr::product_from_factors(rest)))
        }
        _ => None,
    }
}

/// c0 + c1*x + ... + cn*x^n
pub fn from_coeffs(coeffs: &[Expr], var: &str) -> Expr {
    let x = Expr::var(var);
    Expr::sum_from_terms(
        coeffs
            .iter()
            .enumerate()
            .map(|(k, c)| c.times(&x.powi(k as i64)))
            .collect(),
    )
}

/// all coefficients are rational constants
pub fn rational_coeffs(coeffs: &[Expr]) -> Option<Vec<Rational>> {
    coeffs.iter().map(|c| c.as_const().cloned()).collect()
}

pub fn horner(coeffs: &[Rational], x: &Rational) -> Rational {
    coeffs
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, c| acc * x + c)
}

/// divides by (x - r), dropping the remainder
fn deflate(coeffs: &[Rational], r: &Rational) -> Vec<Rational> {
    let n = coeffs.len() - 1;
    let mut quotient = vec![Rational::zero(); n];
    let mut carry = Rational::zero();
    for k in (1..=n).rev() {
        carry = &carry * r + &coeffs[k];
        quotient[k - 1] = carry.clone();
    }
    quotient
}

fn positive_divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d * d != n {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

/// scales to integer coefficients
fn integer_coeffs(coeffs: &[Rational]) -> Vec<BigInt> {
    let lcm = coeffs
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    coeffs
        .iter()
        .map(|c| (c * Rational::from_integer(lcm.clone())).to_integer())
        .collect()
}

/// one rational root by the rational root theorem
fn find_rational_root(coeffs: &[Rational]) -> Option<Rational> {
    let ints = integer_coeffs(coeffs);
    let a0 = ints.first()?.to_i64()?;
    let an = ints.last()?.to_i64()?;
    if a0 == 0 {
        return Some(Rational::zero());
    }
    if a0.abs() > MAX_DIVISOR_SEARCH || an.abs() > MAX_DIVISOR_SEARCH {
        return None;
    }
    for p in positive_divisors(a0) {
        for q in positive_divisors(an) {
            for sign in [1, -1] {
                let candidate = Rational::new(BigInt::from(sign * p), BigInt::from(q));
                if horner(coeffs, &candidate).is_zero() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// factors of a polynomial with rational coefficients: a power of `var` for the zero roots,
/// one linear factor per rational root (with multiplicity) and the irreducible rest
pub fn factor_rational_polynomial(coeffs: &[Rational], var: &str) -> Vec<Expr> {
    let mut factors = Vec::new();
    let x = Expr::var(var);
    let zeros = coeffs.iter().take_while(|c| c.is_zero()).count();
    if zeros >= coeffs.len() {
        return factors;
    }
    if zeros > 0 {
        factors.push(x.powi(zeros as i64));
    }
    let mut rest: Vec<Rational> = coeffs[zeros..].to_vec();
    while rest.len() > 2 {
        match find_rational_root(&rest) {
            Some(r) => {
                factors.push(x.minus(&Expr::Const(r.clone())));
                rest = deflate(&rest, &r);
            }
            None => break,
        }
    }
    if rest.len() >= 2 {
        let remaining: Vec<Expr> = rest.into_iter().map(Expr::Const).collect();
        factors.push(from_coeffs(&remaining, var));
    }
    factors
}

/// factors of an expression that is a polynomial with rational coefficients in `var`;
/// None when it is not such a polynomial
pub fn factor_expression(expr: &Expr, var: &str) -> Option<Vec<Expr>> {
    let coeffs = expr.coeffs(var).ok()?;
    let rational = rational_coeffs(&coeffs)?;
    Some(factor_rational_polynomial(&rational, var))
}

fn complex_horner(coeffs: &[f64], z: Complex64) -> (Complex64, Complex64) {
    // value and derivative at z
    let mut p = Complex64::new(0.0, 0.0);
    let mut dp = Complex64::new(0.0, 0.0);
    for &c in coeffs.iter().rev() {
        dp = dp * z + p;
        p = p * z + c;
    }
    (p, dp)
}

/// simultaneous Newton iteration on all roots of the monic polynomial, from points on a
/// spiral; used when the QR iteration on the companion matrix does not settle
fn durand_kerner(c: &[f64]) -> Vec<Complex64> {
    let n = c.len() - 1;
    let monic: Vec<f64> = c.iter().map(|v| v / c[n]).collect();
    let seed = Complex64::new(0.4, 0.9);
    let mut z: Vec<Complex64> = (0..n).map(|k| seed.powu(k as u32)).collect();
    for _ in 0..DURAND_KERNER_ITERATIONS {
        let mut largest_step: f64 = 0.0;
        for k in 0..n {
            let (p, _) = complex_horner(&monic, z[k]);
            let denominator: Complex64 = (0..n)
                .filter(|&j| j != k)
                .map(|j| z[k] - z[j])
                .product();
            if denominator.norm() == 0.0 {
                continue;
            }
            let step = p / denominator;
            z[k] -= step;
            largest_step = largest_step.max(step.norm() / z[k].norm().max(1.0));
        }
        if largest_step <= f64::EPSILON {
            break;
        }
    }
    z
}

/// numeric roots (complex included) of c0 + c1*x + ... + cn*x^n as eigenvalues of the
/// companion matrix, each polished with a few Newton steps
pub fn proots(coeffs: &[Rational]) -> Vec<Complex64> {
    let mut c: Vec<f64> = coeffs.iter().map(rat_to_f64).collect();
    while c.len() > 1 && c.last().is_some_and(|v| *v == 0.0) {
        c.pop();
    }
    let n = c.len().saturating_sub(1);
    if n == 0 {
        return Vec::new();
    }
    let lead = c[n];
    if n == 1 {
        return vec![Complex64::new(-c[0] / lead, 0.0)];
    }
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    for i in 0..n {
        companion[(i, n - 1)] = -c[i] / lead;
    }
    let estimates: Vec<Complex64> = match Schur::try_new(companion, f64::EPSILON, SCHUR_MAX_ITERATIONS) {
        Some(schur) => schur.complex_eigenvalues().iter().copied().collect(),
        None => {
            debug!("companion matrix of degree {} did not converge, using Durand-Kerner", n);
            durand_kerner(&c)
        }
    };
    estimates
        .into_iter()
        .map(|z0| {
            let mut z = z0;
            for _ in 0..POLISH_ITERATIONS {
                let (p, dp) = complex_horner(&c, z);
                if dp.norm() == 0.0 {
                    break;
                }
                let step = p / dp;
                z -= step;
                if step.norm() <= f64::EPSILON * z.norm().max(1.0) {
                    break;
                }
            }
            z
        })
        .collect()
}

/// numeric complex value as an exact-decimal expression `re + im*i`
pub fn complex_to_expr(z: Complex64) -> Option<Expr> {
    let scale = z.norm().max(1.0);
    let re = if z.re.abs() <= 1e-12 * scale { 0.0 } else { z.re };
    let im = if z.im.abs() <= 1e-10 * scale { 0.0 } else { z.im };
    let re = Expr::Const(f64_to_rational(re, 12)?);
    if im == 0.0 {
        return Some(re);
    }
    let im = Expr::Const(f64_to_rational(im, 12)?);
    Some(re.plus(&im.times(&Expr::i())))
}

/// the polynomial has only real integer roots and proots found all of them exactly
pub fn exact_integer_roots(coeffs: &[Rational]) -> Option<Vec<Rational>> {
    let roots = proots(coeffs);
    if roots.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(roots.len());
    for z in roots {
        if z.im.abs() > 1e-8 || !z.re.is_finite() {
            return None;
        }
        let rounded = Rational::from_integer(BigInt::from(z.re.round() as i64));
        if !horner(coeffs, &rounded).is_zero() {
            return None;
        }
        out.push(rounded);
    }
    out.sort();
    Some(out)
}
