//! Canonical arithmetic on [`Expr`].
//!
//! Every constructor in this module returns an expression in canonical form: like terms of a
//! sum are merged, like factors of a product have their exponents added, constants are folded
//! into multipliers and exact powers of rationals are computed. `expand` multiplies out
//! products of sums and positive integer powers of sums.
use crate::symbolic::symbolic_engine::{EULER, Expr, FuncName, IMAGINARY, NAN_SYMBOL};
use crate::symbolic::utils::{
    Rational, extract_root_factors, perfect_root, rat, rat_int, rat_pow, rat_to_i64,
};
use num::{BigInt, Integer, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// powers of sums above this are left unexpanded
const MAX_EXPAND_POWER: i64 = 24;
/// guard against runaway re-combination of product factors
const MAX_COMBINE_PASSES: usize = 12;

impl Expr {
    ////////////////////////////SCALING////////////////////////////////////////
    /// multiplies by a rational
    pub fn scale(&self, m: &Rational) -> Expr {
        if m.is_one() {
            return self.clone();
        }
        if m.is_zero() {
            return Expr::c(0);
        }
        match self {
            Expr::Const(c) => Expr::Const(c * m),
            Expr::Sum { terms, power, .. } if power.is_one() => {
                Expr::sum_from_terms(terms.iter().map(|t| t.scale(m)).collect())
            }
            _ => {
                let new_mult = self.mult() * m;
                if new_mult.is_zero() {
                    Expr::c(0)
                } else {
                    self.replace_mult(new_mult)
                }
            }
        }
    }

    pub fn negate(&self) -> Expr {
        self.scale(&-Rational::one())
    }

    ////////////////////////////ADDITION///////////////////////////////////////
    /// canonical sum of arbitrary terms
    pub fn sum_from_terms(terms: Vec<Expr>) -> Expr {
        let mut constant = Rational::zero();
        // key -> (unit, accumulated multiplier); BTreeMap keeps the merge deterministic
        let mut like: BTreeMap<String, (Expr, Rational)> = BTreeMap::new();
        let mut pending = terms;
        while let Some(term) = pending.pop() {
            match term {
                Expr::Const(c) => constant += c,
                Expr::Sum {
                    terms: inner,
                    power,
                    ..
                } if power.is_one() => pending.extend(inner),
                other => {
                    if other.is_nan() {
                        return Expr::nan();
                    }
                    let key = other.term_key();
                    let m = other.mult();
                    like.entry(key)
                        .and_modify(|(_, acc)| *acc += &m)
                        .or_insert((other.unit(), m));
                }
            }
        }
        let mut out: Vec<Expr> = like
            .into_values()
            .filter(|(_, m)| !m.is_zero())
            .map(|(unit, m)| unit.scale(&m))
            .collect();
        if !constant.is_zero() {
            out.push(Expr::Const(constant));
        }
        match out.len() {
            0 => Expr::c(0),
            1 => out.remove(0),
            _ => {
                out.sort_by(compare_terms);
                Expr::Sum {
                    terms: out,
                    power: Rational::one(),
                    mult: Rational::one(),
                }
            }
        }
    }

    pub fn plus(&self, other: &Expr) -> Expr {
        Expr::sum_from_terms(vec![self.clone(), other.clone()])
    }

    pub fn minus(&self, other: &Expr) -> Expr {
        Expr::sum_from_terms(vec![self.clone(), other.negate()])
    }

    ////////////////////////////MULTIPLICATION/////////////////////////////////
    /// canonical product of arbitrary factors
    pub fn product_from_factors(items: Vec<Expr>) -> Expr {
        let mut mult = Rational::one();
        let mut factors: Vec<Expr> = Vec::new();
        for item in items {
            if item.is_nan() {
                return Expr::nan();
            }
            match item {
                Expr::Const(c) => mult *= c,
                Expr::Product { factors: inner, mult: m } => {
                    mult *= m;
                    factors.extend(inner);
                }
                other => {
                    mult *= other.mult();
                    let unit = other.unit();
                    match leading_sign_out(&unit) {
                        Some((flipped, sign)) => {
                            mult *= sign;
                            factors.push(flipped);
                        }
                        None => factors.push(unit),
                    }
                }
            }
        }
        if mult.is_zero() {
            return Expr::c(0);
        }
        for _ in 0..MAX_COMBINE_PASSES {
            let (combined, extra_mult, changed) = combine_factors(factors);
            mult *= extra_mult;
            factors = combined;
            if mult.is_zero() {
                return Expr::c(0);
            }
            if !changed {
                break;
            }
        }
        if factors.iter().any(|f| f.is_nan()) {
            return Expr::nan();
        }
        match factors.len() {
            0 => Expr::Const(mult),
            1 => factors.remove(0).scale(&mult),
            _ => {
                factors.sort_by_key(|f| f.to_string());
                Expr::Product { factors, mult }
            }
        }
    }

    pub fn times(&self, other: &Expr) -> Expr {
        match (self, other) {
            (Expr::Const(c), _) => other.scale(c),
            (_, Expr::Const(c)) => self.scale(c),
            _ => Expr::product_from_factors(vec![self.clone(), other.clone()]),
        }
    }

    pub fn divide(&self, other: &Expr) -> Expr {
        if other.is_zero() {
            return Expr::nan();
        }
        self.times(&other.powr(&-Rational::one()))
    }

    ////////////////////////////POWERS/////////////////////////////////////////
    pub fn powi(&self, n: i64) -> Expr {
        self.powr(&rat_int(n))
    }

    /// raises to a rational power
    pub fn powr(&self, p: &Rational) -> Expr {
        if p.is_zero() {
            return Expr::c(1);
        }
        if p.is_one() {
            return self.clone();
        }
        match self {
            Expr::Const(c) => const_pow(c, p),
            Expr::Var { name, power, mult } => {
                let mult_part = const_pow(mult, p);
                let new_power = power * p;
                let body = if name == IMAGINARY {
                    imaginary_pow(&new_power)
                } else if name == NAN_SYMBOL {
                    Expr::nan()
                } else if new_power.is_zero() {
                    Expr::c(1)
                } else {
                    Expr::Var {
                        name: name.clone(),
                        power: new_power,
                        mult: Rational::one(),
                    }
                };
                mult_part.times(&body)
            }
            Expr::Product { factors, mult } => {
                let mut items: Vec<Expr> = factors.iter().map(|f| f.powr(p)).collect();
                items.push(const_pow(mult, p));
                Expr::product_from_factors(items)
            }
            Expr::Sum { terms, power, mult } => {
                let mult_part = const_pow(mult, p);
                let new_power = power * p;
                let body = if new_power.is_zero() {
                    Expr::c(1)
                } else if terms.len() == 1 {
                    terms[0].powr(&new_power)
                } else {
                    let raised = Expr::Sum {
                        terms: terms.clone(),
                        power: new_power,
                        mult: Rational::one(),
                    };
                    match leading_sign_out(&raised) {
                        Some((flipped, sign)) => flipped.scale(&sign),
                        None => raised,
                    }
                };
                mult_part.times(&body)
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let mult_part = const_pow(mult, p);
                let new_power = power * p;
                let body = if new_power.is_zero() {
                    Expr::c(1)
                } else if *name == FuncName::sqrt && new_power.is_integer() {
                    // sqrt(u)^(2k) = u^k, sqrt(u)^(2k+1) = u^k*sqrt(u)
                    let half = &new_power / rat_int(2);
                    args[0].powr(&half)
                } else {
                    Expr::Func {
                        name: *name,
                        args: args.clone(),
                        power: new_power,
                        mult: Rational::one(),
                    }
                };
                mult_part.times(&body)
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => {
                let mult_part = const_pow(mult, p);
                let new_exponent = exponent.scale(p);
                mult_part.times(&base.pow_expr(&new_exponent))
            }
        }
    }

    /// raises to an arbitrary exponent
    pub fn pow_expr(&self, exponent: &Expr) -> Expr {
        if let Expr::Const(p) = exponent {
            return self.powr(p);
        }
        if exponent.is_nan() || self.is_nan() {
            return Expr::nan();
        }
        match self {
            Expr::Const(c) if c.is_one() => Expr::c(1),
            Expr::Const(c) if c.is_zero() => Expr::Exponential {
                base: Box::new(Expr::c(0)),
                exponent: Box::new(exponent.clone()),
                mult: Rational::one(),
            },
            Expr::Const(c) if c.is_negative() && *c != -Rational::one() => {
                // (-c)^y = (-1)^y * c^y
                let positive = Expr::Const(-c.clone()).pow_expr(exponent);
                Expr::c(-1).pow_expr(exponent).times(&positive)
            }
            Expr::Const(_) => Expr::Exponential {
                base: Box::new(self.clone()),
                exponent: Box::new(exponent.clone()),
                mult: Rational::one(),
            },
            Expr::Product { factors, mult } => {
                let mut items: Vec<Expr> = factors.iter().map(|f| f.pow_expr(exponent)).collect();
                items.push(Expr::Const(mult.clone()).pow_expr(exponent));
                Expr::product_from_factors(items)
            }
            Expr::Exponential {
                base,
                exponent: inner,
                mult,
            } if mult.is_one() => base.pow_expr(&inner.times(exponent)),
            _ => {
                let m = self.mult();
                let mult_part = if m.is_one() {
                    Expr::c(1)
                } else {
                    Expr::Const(m).pow_expr(exponent)
                };
                let (base, inner) = self.unit().base_and_exponent();
                let total = inner.times(exponent);
                let body = if let Expr::Const(p) = &total {
                    base.powr(p)
                } else {
                    Expr::Exponential {
                        base: Box::new(base),
                        exponent: Box::new(total),
                        mult: Rational::one(),
                    }
                };
                mult_part.times(&body)
            }
        }
    }

    ////////////////////////////FUNCTIONS//////////////////////////////////////
    /// square root; exact for rational squares
    pub fn sqrt_of(arg: &Expr) -> Expr {
        match arg {
            Expr::Const(_) => arg.powr(&rat(1, 2)),
            _ => Expr::func(FuncName::sqrt, arg.clone()),
        }
    }

    pub fn exp_of(arg: &Expr) -> Expr {
        Expr::e().pow_expr(arg)
    }

    pub fn log_of(arg: &Expr) -> Expr {
        Expr::func(FuncName::log, arg.clone())
    }

    pub fn func(name: FuncName, arg: Expr) -> Expr {
        Expr::func_with_args(name, vec![arg])
    }

    /// function application with the handful of exact values the solver relies on
    pub fn func_with_args(name: FuncName, args: Vec<Expr>) -> Expr {
        if args.iter().any(|a| a.is_nan()) {
            return Expr::nan();
        }
        if let [arg] = args.as_slice() {
            if let Some(value) = exact_function_value(name, arg) {
                return value;
            }
        }
        Expr::Func {
            name,
            args,
            power: Rational::one(),
            mult: Rational::one(),
        }
    }

    ////////////////////////////EXPANSION//////////////////////////////////////
    /// multiplies out products of sums and positive integer powers of sums
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var { .. } => self.clone(),
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let args = args.iter().map(|a| a.expand()).collect();
                Expr::func_with_args(*name, args).powr(power).scale(mult)
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => base.expand().pow_expr(&exponent.expand()).scale(mult),
            Expr::Sum { terms, power, mult } => {
                let inner = Expr::sum_from_terms(terms.iter().map(|t| t.expand()).collect());
                let expanded = match rat_to_i64(power) {
                    Some(n) if n > 1 && n <= MAX_EXPAND_POWER => {
                        let mut acc = inner.clone();
                        for _ in 1..n {
                            acc = distribute(&acc, &inner);
                        }
                        acc
                    }
                    _ => inner.powr(power),
                };
                expanded.scale(mult)
            }
            Expr::Product { factors, mult } => {
                let mut acc = Expr::Const(mult.clone());
                for factor in factors {
                    acc = distribute(&acc, &factor.expand());
                }
                acc
            }
        }
    }
}

/// product of two expanded expressions with the result expanded
fn distribute(a: &Expr, b: &Expr) -> Expr {
    let mut out = Vec::new();
    for ta in a.terms() {
        for tb in b.terms() {
            out.push(ta.times(&tb));
        }
    }
    Expr::sum_from_terms(out)
}

/// constants last, higher degree first, then printed form
fn compare_terms(a: &Expr, b: &Expr) -> Ordering {
    match (a.is_const(), b.is_const()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    b.degree_weight()
        .partial_cmp(&a.degree_weight())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.term_key().cmp(&b.term_key()))
}

/// (-u)^n = (-1)^n * u^n for integer n: a sum factor keeps a positive leading term.
/// Returns the flipped sum and the sign pulled out of it.
fn leading_sign_out(expr: &Expr) -> Option<(Expr, Rational)> {
    let Expr::Sum { terms, power, mult } = expr else {
        return None;
    };
    let n = rat_to_i64(power)?;
    if terms.len() < 2 || !terms[0].mult().is_negative() {
        return None;
    }
    let flipped = Expr::Sum {
        terms: terms.iter().map(|t| t.negate()).collect(),
        power: power.clone(),
        mult: mult.clone(),
    };
    let sign = if n.is_odd() { -Rational::one() } else { Rational::one() };
    Some((flipped, sign))
}

/// merges factors with equal bases; returns the new factors, a multiplier pulled out of
/// them and whether anything changed
fn combine_factors(factors: Vec<Expr>) -> (Vec<Expr>, Rational, bool) {
    let mut groups: BTreeMap<String, (Expr, Vec<Expr>)> = BTreeMap::new();
    let count = factors.len();
    for factor in factors {
        let (base, exponent) = factor.base_and_exponent();
        groups
            .entry(base.to_string())
            .or_insert_with(|| (base, Vec::new()))
            .1
            .push(exponent);
    }
    let mut changed = groups.len() != count;
    let mut mult = Rational::one();
    let mut out = Vec::new();
    for (_, (base, exponents)) in groups {
        let exponent = Expr::sum_from_terms(exponents);
        let value = base.pow_expr(&exponent);
        match value {
            Expr::Const(c) => {
                mult *= c;
                changed = true;
            }
            Expr::Product { factors, mult: m } => {
                mult *= m;
                out.extend(factors);
                changed = true;
            }
            other => {
                mult *= other.mult();
                out.push(other.unit());
            }
        }
    }
    (out, mult, changed)
}

/// i^k reduced modulo 4 for integer k
fn imaginary_pow(power: &Rational) -> Expr {
    match rat_to_i64(power) {
        Some(k) => match k.rem_euclid(4) {
            0 => Expr::c(1),
            1 => Expr::i(),
            2 => Expr::c(-1),
            _ => Expr::i().negate(),
        },
        None => Expr::Var {
            name: IMAGINARY.to_string(),
            power: power.clone(),
            mult: Rational::one(),
        },
    }
}

/// exact c^p where possible; irrational parts stay as `Exponential` nodes with positive
/// integer base
fn const_pow(c: &Rational, p: &Rational) -> Expr {
    if p.is_zero() || c.is_one() {
        return Expr::c(1);
    }
    if p.is_integer() {
        let n = rat_to_i64(p).unwrap_or(0);
        return match rat_pow(c, n) {
            Some(value) => Expr::Const(value),
            None => Expr::nan(),
        };
    }
    if c.is_zero() {
        return if p.is_positive() { Expr::c(0) } else { Expr::nan() };
    }
    let numer = p.numer().to_i64().unwrap_or(1);
    let denom = p.denom().to_i64().unwrap_or(1);
    // c^(n/d) = (c^n)^(1/d)
    let Some(raised) = rat_pow(c, numer) else {
        return Expr::nan();
    };
    let root = rational_root(&raised.abs(), denom);
    if !raised.is_negative() {
        return root;
    }
    if denom.is_odd() {
        root.negate()
    } else if denom == 2 {
        root.times(&Expr::i())
    } else {
        Expr::Exponential {
            base: Box::new(Expr::c(-1)),
            exponent: Box::new(Expr::frac(1, denom)),
            mult: Rational::one(),
        }
        .times(&root)
    }
}

/// d-th root of a non-negative rational with the denominator rationalized:
/// (a/b)^(1/d) = (a*b^(d-1))^(1/d) / b
fn rational_root(r: &Rational, d: i64) -> Expr {
    let k = d as u32;
    if let (Some(a), Some(b)) = (perfect_root(r.numer(), k), perfect_root(r.denom(), k)) {
        return Expr::Const(Rational::new(a, b));
    }
    let b = r.denom().clone();
    let radicand: BigInt = r.numer() * num_traits::pow(b.clone(), (d - 1) as usize);
    let (outside, inside) = extract_root_factors(&radicand, k);
    let coefficient = Rational::new(outside, b);
    if inside.is_one() {
        return Expr::Const(coefficient);
    }
    Expr::Exponential {
        base: Box::new(Expr::Const(Rational::from_integer(inside))),
        exponent: Box::new(Expr::frac(1, d)),
        mult: coefficient,
    }
}

fn exact_function_value(name: FuncName, arg: &Expr) -> Option<Expr> {
    match (name, arg) {
        (FuncName::abs, Expr::Const(c)) => Some(Expr::Const(c.abs())),
        (FuncName::abs, other) if other.mult().is_negative() => {
            Some(Expr::func(FuncName::abs, other.negate()))
        }
        (FuncName::sqrt, Expr::Const(_)) => Some(Expr::sqrt_of(arg)),
        (FuncName::sin | FuncName::tan | FuncName::asin | FuncName::atan, c) if c.is_zero() => {
            Some(Expr::c(0))
        }
        (FuncName::cos, c) if c.is_zero() => Some(Expr::c(1)),
        (FuncName::acos, c) if c.is_one() => Some(Expr::c(0)),
        (FuncName::log, c) if c.is_one() => Some(Expr::c(0)),
        (FuncName::log, e) if e.is_var(EULER) => Some(Expr::c(1)),
        (FuncName::log, Expr::Exponential { base, exponent, mult })
            if base.is_var(EULER) && mult.is_one() =>
        {
            Some((**exponent).clone())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_like_terms_merge() {
        let e = x().scale(&rat_int(2)).plus(&x().scale(&rat_int(3)));
        assert_eq!(e, x().scale(&rat_int(5)));
        let zero = x().minus(&x());
        assert!(zero.is_zero());
    }

    #[test]
    fn test_like_factors_merge() {
        let e = x().times(&x());
        assert_eq!(e, x().powi(2));
        let one = x().divide(&x());
        assert!(one.is_one());
    }

    #[test]
    fn test_sqrt_constants() {
        assert_eq!(Expr::sqrt_of(&Expr::c(4)), Expr::c(2));
        assert_eq!(Expr::sqrt_of(&Expr::c(12)).to_string(), "2*3^(1/2)");
        assert_eq!(Expr::sqrt_of(&Expr::c(-4)), Expr::c(2).times(&Expr::i()));
        assert_eq!(Expr::sqrt_of(&Expr::frac(1, 2)).to_string(), "1/2*2^(1/2)");
        let two = Expr::sqrt_of(&Expr::c(2)).times(&Expr::sqrt_of(&Expr::c(2)));
        assert_eq!(two, Expr::c(2));
    }

    #[test]
    fn test_odd_root_of_negative_is_real() {
        assert_eq!(Expr::c(-8).powr(&rat(1, 3)), Expr::c(-2));
    }

    #[test]
    fn test_imaginary_powers() {
        assert_eq!(Expr::i().times(&Expr::i()), Expr::c(-1));
        assert_eq!(Expr::i().powi(3), Expr::i().negate());
        assert_eq!(Expr::i().powi(4), Expr::c(1));
    }

    #[test]
    fn test_division_by_zero_is_nan() {
        assert!(x().divide(&Expr::c(0)).is_nan());
        assert!(Expr::c(0).powi(-1).is_nan());
    }

    #[test]
    fn test_expand() {
        let s = x().plus(&Expr::c(1));
        let squared = s.powi(2).expand();
        assert_eq!(squared.to_string(), "x^2+2*x+1");
        let product = x().plus(&Expr::c(2)).times(&x().minus(&Expr::c(2))).expand();
        assert_eq!(product.to_string(), "x^2-4");
    }

    #[test]
    fn test_sqrt_squared() {
        let s = Expr::sqrt_of(&x().plus(&Expr::c(1)));
        assert_eq!(s.powi(2), x().plus(&Expr::c(1)));
    }

    #[test]
    fn test_exponentials_merge() {
        let a = Expr::exp_of(&x());
        let b = Expr::exp_of(&Expr::var("y"));
        assert_eq!(a.times(&b).to_string(), "e^(x+y)");
        assert_eq!(Expr::log_of(&a), x());
    }
}
