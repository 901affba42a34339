//! Equation model: a left and a right hand side that normalize to one expression equal to zero.
use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::Rational;
use num::{BigInt, Integer, One, Signed};
use std::collections::BTreeMap;
use std::fmt;

/// clearing one denominator can expose another one, this bounds the rounds
const MAX_DENOMINATOR_PASSES: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// denominator of a single term: the integer denominator of its multiplier and the inverse of
/// every factor raised to a negative rational power
fn term_denominators(term: &Expr, integer: &mut BigInt, symbolic: &mut BTreeMap<String, (Expr, Rational)>) {
    let m = term.mult();
    *integer = integer.lcm(m.denom());
    for factor in term.factors() {
        let p = factor.power();
        if !p.is_negative() {
            continue;
        }
        let (base, _) = factor.base_and_exponent();
        let needed = -p;
        symbolic
            .entry(base.to_string())
            .and_modify(|(_, q)| {
                if needed > *q {
                    *q = needed.clone()
                }
            })
            .or_insert((base, needed));
    }
}

/// least common multiple of the denominators of all terms of both sides
fn common_denominator(lhs: &Expr, rhs: &Expr) -> Expr {
    let mut integer = BigInt::one();
    let mut symbolic = BTreeMap::new();
    for term in lhs.terms().iter().chain(rhs.terms().iter()) {
        term_denominators(term, &mut integer, &mut symbolic);
    }
    let mut factors: Vec<Expr> = symbolic
        .into_values()
        .map(|(base, p)| base.powr(&p))
        .collect();
    factors.push(Expr::Const(Rational::from_integer(integer)));
    Expr::product_from_factors(factors)
}

/// multiplies term by term so that the denominators cancel before anything is distributed
fn multiply_out(side: &Expr, by: &Expr) -> Expr {
    Expr::sum_from_terms(side.terms().iter().map(|t| t.times(by).expand()).collect())
}

impl Equation {
    /// fails when the two sides are different numbers or one side is the bare imaginary unit
    pub fn new(lhs: Expr, rhs: Expr) -> Result<Equation, SolveError> {
        let both_constant_and_different = lhs.is_const() && rhs.is_const() && lhs != rhs;
        let one_side_imaginary = lhs.is_imaginary_unit() != rhs.is_imaginary_unit();
        if both_constant_and_different || one_side_imaginary {
            return Err(SolveError::Contradiction(format!("{} does not equal {}", lhs, rhs)));
        }
        Ok(Equation { lhs, rhs })
    }

    /// parses "lhs=rhs"; a missing right hand side means zero
    pub fn parse(input: &str) -> Result<Equation, SolveError> {
        let mut sides = input.split('=');
        let lhs = sides.next().unwrap_or_default();
        let rhs = sides.next();
        if sides.next().is_some() {
            return Err(SolveError::parse(input, "more than one '=' sign"));
        }
        let lhs = Expr::parse_expression(lhs)?;
        let rhs = match rhs {
            Some(text) if !text.trim().is_empty() => Expr::parse_expression(text)?,
            _ => Expr::c(0),
        };
        Equation::new(lhs, rhs)
    }

    /// the same equation multiplied through by the common denominator of both sides
    pub fn remove_denominators(&self) -> Equation {
        let mut lhs = self.lhs.clone();
        let mut rhs = self.rhs.clone();
        for _ in 0..MAX_DENOMINATOR_PASSES {
            let den = common_denominator(&lhs, &rhs);
            if den.is_one() {
                break;
            }
            lhs = multiply_out(&lhs, &den);
            rhs = multiply_out(&rhs, &den);
        }
        Equation { lhs, rhs }
    }

    /// lhs - rhs with denominators cleared, expanded
    pub fn to_lhs(&self) -> Expr {
        let cleared = self.remove_denominators();
        cleared.lhs.minus(&cleared.rhs).expand()
    }

    pub fn is_zero(&self) -> bool {
        let lhs = self.to_lhs();
        if lhs.is_zero() {
            return true;
        }
        lhs.variables().is_empty()
            && lhs
                .eval_constant()
                .map(|z| z.norm() <= 1e-12)
                .unwrap_or(false)
    }

    pub fn substitute(&self, var: &str, value: &Expr) -> Equation {
        Equation {
            lhs: self.lhs.substitute(var, value),
            rhs: self.rhs.substitute(var, value),
        }
    }

    /// sorted union of the variables of both sides
    pub fn variables(&self) -> Vec<String> {
        let mut vars = self.lhs.variables();
        vars.extend(self.rhs.variables());
        vars.sort();
        vars.dedup();
        vars
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.lhs, self.rhs)
    }
}
