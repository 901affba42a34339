//! # Symbolic Engine Module
//!
//! Core expression type of the solver. Every node is an immutable value in canonical form:
//! transformations (arithmetic, substitution, expansion, differentiation) always build a new
//! node instead of mutating an existing one, so branches of a solve can share subexpressions
//! freely.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Const**: exact rational constant
//! - **Var**: named symbol with rational power and multiplier (`pi`, `e`, `i` are symbols too)
//! - **Product**: canonically sorted factors with a rational multiplier
//! - **Sum**: canonically sorted terms with rational power and multiplier
//! - **Func**: closed set of elementary functions with power and multiplier
//! - **Exponential**: base raised to a symbolic or irrational exponent
//!
//! ### Key Methods
//! - `parse_expression(s)` - string to canonical expression (see `parse_expr`)
//! - `plus`, `minus`, `times`, `divide`, `pow_expr` - canonical arithmetic (see `symbolic_simplify`)
//! - `expand()` - multiply out products and integer powers of sums
//! - `diff(var)` - analytical differentiation
//! - `lambdify1(vars)` / `eval_complex(bindings)` - numeric evaluation
//! - `substitute(var, value)` - replace a variable with an expression
//!
//! ## Canonical form
//! 1. Constants fold into the multiplier of their neighbour; a product never holds a constant factor.
//! 2. A sum raised to the first power carries multiplier 1: constants distribute into its terms.
//! 3. Factors are sorted by their printed form, terms by degree (constants last).
//! 4. Like terms and like factors are merged by comparing printed forms, so the `Display`
//!    output doubles as the canonical key of a node.

#![allow(non_camel_case_types)]

use crate::symbolic::utils::{Rational, rat_int, rat_to_f64};
use num::{One, Signed, Zero};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use strum_macros::{Display, EnumIter, EnumString};

/// names of symbols that are constants, never unknowns
pub const PI: &str = "pi";
pub const EULER: &str = "e";
pub const IMAGINARY: &str = "i";
/// sentinel produced by division by an exact zero
pub const NAN_SYMBOL: &str = "NaN";

/// Closed set of supported elementary functions.
///
/// Parsing accepts the aliases `ln`, `tg`, `ctg`, `arcsin`, `arccos`, `arctg`, `arctan`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum FuncName {
    #[strum(to_string = "sin")]
    sin,
    #[strum(to_string = "cos")]
    cos,
    #[strum(to_string = "tan", serialize = "tg")]
    tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    cot,
    #[strum(to_string = "sec")]
    sec,
    #[strum(to_string = "csc")]
    csc,
    #[strum(to_string = "asin", serialize = "arcsin")]
    asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    acos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    atan,
    #[strum(to_string = "log", serialize = "ln")]
    log,
    #[strum(to_string = "sqrt")]
    sqrt,
    #[strum(to_string = "abs")]
    abs,
}

impl FuncName {
    pub fn is_trig(&self) -> bool {
        matches!(
            self,
            FuncName::sin | FuncName::cos | FuncName::tan | FuncName::cot | FuncName::sec | FuncName::csc
        )
    }
}

/// Symbolic expression in canonical form.
///
/// # Examples
/// ```rust, ignore
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// let expr = Expr::c(2) * x.clone() + Expr::c(1);
/// assert_eq!(expr.to_string(), "2*x+1");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// exact rational constant, its own multiplier
    Const(Rational),
    /// mult * name^power
    Var {
        name: String,
        power: Rational,
        mult: Rational,
    },
    /// mult * f1 * f2 * ..., factors have multiplier 1
    Product { factors: Vec<Expr>, mult: Rational },
    /// mult * (t1 + t2 + ...)^power
    Sum {
        terms: Vec<Expr>,
        power: Rational,
        mult: Rational,
    },
    /// mult * name(args)^power
    Func {
        name: FuncName,
        args: Vec<Expr>,
        power: Rational,
        mult: Rational,
    },
    /// mult * base^exponent
    Exponential {
        base: Box<Expr>,
        exponent: Box<Expr>,
        mult: Rational,
    },
}

impl Expr {
    ////////////////////////////CONSTRUCTORS///////////////////////////////////
    pub fn c(n: i64) -> Expr {
        Expr::Const(rat_int(n))
    }

    pub fn rational(r: Rational) -> Expr {
        Expr::Const(r)
    }

    pub fn frac(numer: i64, denom: i64) -> Expr {
        Expr::Const(crate::symbolic::utils::rat(numer, denom))
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var {
            name: name.to_string(),
            power: Rational::one(),
            mult: Rational::one(),
        }
    }

    pub fn pi() -> Expr {
        Expr::var(PI)
    }

    pub fn e() -> Expr {
        Expr::var(EULER)
    }

    pub fn i() -> Expr {
        Expr::var(IMAGINARY)
    }

    pub fn nan() -> Expr {
        Expr::var(NAN_SYMBOL)
    }

    /// comma separated names into variables: `Expr::Symbols("x, y")`
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Expr::var)
            .collect()
    }

    pub fn is_constant_symbol(name: &str) -> bool {
        matches!(name, PI | EULER | IMAGINARY | NAN_SYMBOL)
    }

    ////////////////////////////ACCESSORS//////////////////////////////////////
    /// rational multiplier; a constant is its own multiplier
    pub fn mult(&self) -> Rational {
        match self {
            Expr::Const(c) => c.clone(),
            Expr::Var { mult, .. }
            | Expr::Product { mult, .. }
            | Expr::Sum { mult, .. }
            | Expr::Func { mult, .. }
            | Expr::Exponential { mult, .. } => mult.clone(),
        }
    }

    /// the node with its multiplier set to one
    pub fn unit(&self) -> Expr {
        match self {
            Expr::Const(_) => Expr::c(1),
            Expr::Sum { power, .. } if power.is_one() => self.clone(),
            _ => self.replace_mult(Rational::one()),
        }
    }

    /// sets the multiplier without any normalization; callers keep the canonical form
    pub(crate) fn replace_mult(&self, m: Rational) -> Expr {
        match self.clone() {
            Expr::Const(_) => Expr::Const(m),
            Expr::Var { name, power, .. } => Expr::Var { name, power, mult: m },
            Expr::Product { factors, .. } => Expr::Product { factors, mult: m },
            Expr::Sum { terms, power, .. } => Expr::Sum { terms, power, mult: m },
            Expr::Func {
                name, args, power, ..
            } => Expr::Func {
                name,
                args,
                power,
                mult: m,
            },
            Expr::Exponential { base, exponent, .. } => Expr::Exponential {
                base,
                exponent,
                mult: m,
            },
        }
    }

    /// rational power of Var/Sum/Func nodes, 1 otherwise
    pub fn power(&self) -> Rational {
        match self {
            Expr::Var { power, .. } | Expr::Sum { power, .. } | Expr::Func { power, .. } => {
                power.clone()
            }
            _ => Rational::one(),
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    pub fn as_const(&self) -> Option<&Rational> {
        match self {
            Expr::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if c.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if c.is_one())
    }

    /// the bare variable `name` (power 1, multiplier 1)
    pub fn is_var(&self, var: &str) -> bool {
        matches!(self, Expr::Var { name, power, mult } if name == var && power.is_one() && mult.is_one())
    }

    pub fn is_imaginary_unit(&self) -> bool {
        self.is_var(IMAGINARY)
    }

    pub fn is_sum(&self) -> bool {
        matches!(self, Expr::Sum { power, .. } if power.is_one())
    }

    /// sum or product: something made of parts
    pub fn is_composite(&self) -> bool {
        matches!(self, Expr::Sum { .. } | Expr::Product { .. })
    }

    /// additive terms of the expression (a single term unless it is a plain sum)
    pub fn terms(&self) -> Vec<Expr> {
        match self {
            Expr::Sum { terms, power, .. } if power.is_one() => terms.clone(),
            _ => vec![self.clone()],
        }
    }

    /// multiplicative factors, without the multiplier
    pub fn factors(&self) -> Vec<Expr> {
        match self {
            Expr::Product { factors, .. } => factors.clone(),
            Expr::Const(_) => Vec::new(),
            _ => vec![self.unit()],
        }
    }

    /// splits a factor (multiplier ignored) into base and exponent so that like factors can
    /// be merged by adding exponents
    pub fn base_and_exponent(&self) -> (Expr, Expr) {
        match self {
            Expr::Const(c) => (Expr::Const(c.clone()), Expr::c(1)),
            Expr::Var { name, power, .. } => (Expr::var(name), Expr::Const(power.clone())),
            Expr::Sum { terms, power, .. } => (
                Expr::Sum {
                    terms: terms.clone(),
                    power: Rational::one(),
                    mult: Rational::one(),
                },
                Expr::Const(power.clone()),
            ),
            Expr::Func {
                name, args, power, ..
            } => (
                Expr::Func {
                    name: *name,
                    args: args.clone(),
                    power: Rational::one(),
                    mult: Rational::one(),
                },
                Expr::Const(power.clone()),
            ),
            Expr::Exponential { base, exponent, .. } => ((**base).clone(), (**exponent).clone()),
            Expr::Product { .. } => (self.unit(), Expr::c(1)),
        }
    }

    /// key under which like terms are merged in a sum
    pub fn term_key(&self) -> String {
        self.unit().to_string()
    }

    /// total degree used to order the terms of a sum
    pub fn degree_weight(&self) -> f64 {
        match self {
            Expr::Const(_) => 0.0,
            Expr::Var { name, power, .. } => {
                if Expr::is_constant_symbol(name) {
                    0.0
                } else {
                    rat_to_f64(power)
                }
            }
            Expr::Product { factors, .. } => factors.iter().map(|f| f.degree_weight()).sum(),
            Expr::Sum { terms, power, .. } => {
                let inner = terms
                    .iter()
                    .map(|t| t.degree_weight())
                    .fold(0.0_f64, f64::max);
                inner * rat_to_f64(power)
            }
            Expr::Func { .. } | Expr::Exponential { .. } => 0.0,
        }
    }

    ////////////////////////////QUERIES////////////////////////////////////////
    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var { name, .. } => {
                out.insert(name.clone());
            }
            Expr::Product { factors, .. } => factors.iter().for_each(|f| f.collect_symbols(out)),
            Expr::Sum { terms, .. } => terms.iter().for_each(|t| t.collect_symbols(out)),
            Expr::Func { args, .. } => args.iter().for_each(|a| a.collect_symbols(out)),
            Expr::Exponential { base, exponent, .. } => {
                base.collect_symbols(out);
                exponent.collect_symbols(out);
            }
        }
    }

    /// sorted unknowns of the expression; `pi`, `e`, `i` and `NaN` are not unknowns
    pub fn variables(&self) -> Vec<String> {
        let mut all = BTreeSet::new();
        self.collect_symbols(&mut all);
        all.into_iter()
            .filter(|name| !Expr::is_constant_symbol(name))
            .collect()
    }

    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var { name, .. } => name == var,
            Expr::Product { factors, .. } => factors.iter().any(|f| f.contains_var(var)),
            Expr::Sum { terms, .. } => terms.iter().any(|t| t.contains_var(var)),
            Expr::Func { args, .. } => args.iter().any(|a| a.contains_var(var)),
            Expr::Exponential { base, exponent, .. } => {
                base.contains_var(var) || exponent.contains_var(var)
            }
        }
    }

    /// the variable appears inside the argument of a function
    pub fn has_func_of(&self, var: &str) -> bool {
        match self {
            Expr::Const(_) | Expr::Var { .. } => false,
            Expr::Product { factors, .. } => factors.iter().any(|f| f.has_func_of(var)),
            Expr::Sum { terms, .. } => terms.iter().any(|t| t.has_func_of(var)),
            Expr::Func { args, .. } => args.iter().any(|a| a.contains_var(var)),
            Expr::Exponential { base, exponent, .. } => {
                base.has_func_of(var) || exponent.has_func_of(var)
            }
        }
    }

    pub fn has_func(&self, pred: &dyn Fn(FuncName) -> bool) -> bool {
        match self {
            Expr::Const(_) | Expr::Var { .. } => false,
            Expr::Product { factors, .. } => factors.iter().any(|f| f.has_func(pred)),
            Expr::Sum { terms, .. } => terms.iter().any(|t| t.has_func(pred)),
            Expr::Func { name, args, .. } => pred(*name) || args.iter().any(|a| a.has_func(pred)),
            Expr::Exponential { base, exponent, .. } => {
                base.has_func(pred) || exponent.has_func(pred)
            }
        }
    }

    pub fn has_trig(&self) -> bool {
        self.has_func(&|name| name.is_trig())
    }

    pub fn has_log(&self) -> bool {
        self.has_func(&|name| name == FuncName::log)
    }

    /// the variable appears in an exponent
    pub fn has_exponential_of(&self, var: &str) -> bool {
        match self {
            Expr::Const(_) | Expr::Var { .. } => false,
            Expr::Product { factors, .. } => factors.iter().any(|f| f.has_exponential_of(var)),
            Expr::Sum { terms, .. } => terms.iter().any(|t| t.has_exponential_of(var)),
            Expr::Func { args, .. } => args.iter().any(|a| a.has_exponential_of(var)),
            Expr::Exponential { exponent, .. } => exponent.contains_var(var),
        }
    }

    pub fn is_nan(&self) -> bool {
        let mut all = BTreeSet::new();
        self.collect_symbols(&mut all);
        all.contains(NAN_SYMBOL)
    }

    /// every power of `var` in the expression, as they appear on Var nodes
    pub fn powers_of(&self, var: &str) -> Vec<Rational> {
        let mut out = Vec::new();
        self.collect_powers(var, &mut out);
        out
    }

    fn collect_powers(&self, var: &str, out: &mut Vec<Rational>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var { name, power, .. } => {
                if name == var {
                    out.push(power.clone());
                }
            }
            Expr::Product { factors, .. } => factors.iter().for_each(|f| f.collect_powers(var, out)),
            Expr::Sum { terms, .. } => terms.iter().for_each(|t| t.collect_powers(var, out)),
            Expr::Func { args, .. } => args.iter().for_each(|a| a.collect_powers(var, out)),
            Expr::Exponential { base, exponent, .. } => {
                base.collect_powers(var, out);
                exponent.collect_powers(var, out);
            }
        }
    }

    ////////////////////////////SUBSTITUTION///////////////////////////////////
    /// replaces every occurrence of `var` with `value` and re-canonicalizes
    pub fn substitute(&self, var: &str, value: &Expr) -> Expr {
        if !self.contains_var(var) {
            return self.clone();
        }
        match self {
            Expr::Const(_) => self.clone(),
            Expr::Var { name, power, mult } => {
                if name == var {
                    value.powr(power).scale(mult)
                } else {
                    self.clone()
                }
            }
            Expr::Product { factors, mult } => factors
                .iter()
                .fold(Expr::Const(mult.clone()), |acc, f| {
                    acc.times(&f.substitute(var, value))
                }),
            Expr::Sum { terms, power, mult } => {
                let inner = terms
                    .iter()
                    .fold(Expr::c(0), |acc, t| acc.plus(&t.substitute(var, value)));
                inner.powr(power).scale(mult)
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let new_args: Vec<Expr> = args.iter().map(|a| a.substitute(var, value)).collect();
                Expr::func_with_args(*name, new_args).powr(power).scale(mult)
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => base
                .substitute(var, value)
                .pow_expr(&exponent.substitute(var, value))
                .scale(mult),
        }
    }

    /// substitutes several values at once (left to right)
    pub fn substitute_all(&self, bindings: &[(String, Expr)]) -> Expr {
        bindings
            .iter()
            .fold(self.clone(), |acc, (name, value)| acc.substitute(name, value))
    }
}

//___________________________________DISPLAY_______________________________________
fn fmt_rational(r: &Rational) -> String {
    if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}

fn power_suffix(p: &Rational) -> String {
    if p.is_one() {
        String::new()
    } else if p.is_integer() && p.is_positive() {
        format!("^{}", fmt_rational(p))
    } else {
        format!("^({})", fmt_rational(p))
    }
}

fn with_mult(mult: &Rational, body: String) -> String {
    if mult.is_one() {
        body
    } else if *mult == -Rational::one() {
        format!("-{}", body)
    } else {
        format!("{}*{}", fmt_rational(mult), body)
    }
}

fn join_terms(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (k, term) in terms.iter().enumerate() {
        let s = term.to_string();
        if k > 0 && !s.starts_with('-') {
            out.push('+');
        }
        out.push_str(&s);
    }
    out
}

fn fmt_factor(factor: &Expr) -> String {
    match factor {
        Expr::Sum { terms, power, mult } if power.is_one() && mult.is_one() => {
            format!("({})", join_terms(terms))
        }
        _ => factor.to_string(),
    }
}

fn fmt_base(base: &Expr) -> String {
    match base {
        Expr::Var { name, power, mult } if power.is_one() && mult.is_one() => name.clone(),
        Expr::Const(c) if c.is_integer() && !c.is_negative() => fmt_rational(c),
        _ => format!("({})", base),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Expr::Const(c) => fmt_rational(c),
            Expr::Var { name, power, mult } => {
                with_mult(mult, format!("{}{}", name, power_suffix(power)))
            }
            Expr::Product { factors, mult } => {
                let body = factors.iter().map(fmt_factor).collect::<Vec<_>>().join("*");
                with_mult(mult, body)
            }
            Expr::Sum { terms, power, mult } => {
                if power.is_one() && mult.is_one() {
                    join_terms(terms)
                } else {
                    with_mult(mult, format!("({}){}", join_terms(terms), power_suffix(power)))
                }
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",");
                with_mult(mult, format!("{}({}){}", name, args, power_suffix(power)))
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => with_mult(mult, format!("{}^({})", fmt_base(base), exponent)),
        };
        write!(f, "{}", text)
    }
}

//___________________________________OPERATORS_____________________________________
impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        self.plus(&rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        self.minus(&rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        self.times(&rhs)
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        self.divide(&rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.negate()
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        *self = self.plus(&rhs);
    }
}

impl SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        *self = self.minus(&rhs);
    }
}

impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        *self = self.times(&rhs);
    }
}

impl<'a> Add<&'a Expr> for &'a Expr {
    type Output = Expr;
    fn add(self, rhs: &'a Expr) -> Expr {
        self.plus(rhs)
    }
}

impl<'a> Sub<&'a Expr> for &'a Expr {
    type Output = Expr;
    fn sub(self, rhs: &'a Expr) -> Expr {
        self.minus(rhs)
    }
}

impl<'a> Mul<&'a Expr> for &'a Expr {
    type Output = Expr;
    fn mul(self, rhs: &'a Expr) -> Expr {
        self.times(rhs)
    }
}

impl<'a> Div<&'a Expr> for &'a Expr {
    type Output = Expr;
    fn div(self, rhs: &'a Expr) -> Expr {
        self.divide(rhs)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Expr {
        Expr::c(n)
    }
}
