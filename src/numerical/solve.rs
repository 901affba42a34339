//! # Solver
//!
//! Entry points for single equations and systems of equations.
//!
//! A single equation is brought to the form `expr = 0` and classified by shape, first match wins:
//! 1. trivial equations (`0 = 0`, `x = rhs`)
//! 2. a bare power of the variable, a product (every factor is solved), a square root
//! 3. denominators and fractional powers of the variable are cleared; isolated square roots
//!    are squared away and the candidates checked against the original
//! 4. one variable: exact factoring and closed forms for polynomials, numeric roots otherwise
//! 5. several variables, no function of the unknown: coefficients and closed forms
//! 6. anything else: the unknown is isolated by [`rewrite`] and inverse functions are applied
//!
//! Systems go to the linear solver when every equation is linear, otherwise to Newton-Raphson.
//!
//! # Example
//! ```
//! use RustedSolve::numerical::solve::Solver;
//! use RustedSolve::numerical::solve_settings::SolveSettings;
//! use RustedSolve::symbolic::symbolic_engine::Expr;
//! let solver = Solver::new(SolveSettings::default().set_loglevel(None)).unwrap();
//! let roots = solver.solve("x^2-4=0", "x").unwrap();
//! assert!(roots.contains(&Expr::c(2)) && roots.contains(&Expr::c(-2)));
//! let system = solver.solve_system(&["x+y=3", "x-y=1"], None).unwrap();
//! assert_eq!(system.get("x"), Some(&Expr::c(2)));
//! ```
use crate::Utils::logger::init_logger;
use crate::numerical::NR::NR;
use crate::numerical::closed_form::{csolve, cubic, linear, quadratic, quartic};
use crate::numerical::equation::Equation;
use crate::numerical::linear_system::{
    SystemSolution, all_linear, solve_linear_default, solve_linear_explicit, system_variables,
};
use crate::numerical::rewrite::rewrite;
use crate::numerical::root_finder::{ROOT_DIGITS, ROOT_TOLERANCE, find_roots};
use crate::numerical::solve_error::SolveError;
use crate::numerical::solve_settings::SolveSettings;
use crate::symbolic::symbolic_engine::{Expr, FuncName, IMAGINARY};
use crate::symbolic::symbolic_polynomial::{
    complex_to_expr, exact_integer_roots, factor_expression, from_coeffs, proots, rational_coeffs,
};
use crate::symbolic::utils::{Rational, best_rational_approximation, f64_to_rational, rat_to_f64};
use itertools::Itertools;
use log::{debug, info, warn};
use num::{BigInt, One, Signed, ToPrimitive, Zero};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

/// variable solved for when none is named
pub const DEFAULT_VARIABLE: &str = "x";
/// denominators allowed in the pi multiples results are snapped to
const PI_MAX_DENOMINATOR: i64 = 10;
const PI_TOLERANCE: f64 = 1e-10;

/// Result of one solving strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Found(Vec<Expr>),
    NotFound,
    /// the strategy does not apply or broke down; the dispatcher logs it and moves on
    Error(SolveError),
}

impl From<Vec<Expr>> for StrategyOutcome {
    fn from(found: Vec<Expr>) -> Self {
        if found.is_empty() {
            StrategyOutcome::NotFound
        } else {
            StrategyOutcome::Found(found)
        }
    }
}

impl From<Result<Vec<Expr>, SolveError>> for StrategyOutcome {
    fn from(result: Result<Vec<Expr>, SolveError>) -> Self {
        match result {
            Ok(found) => found.into(),
            Err(e) => StrategyOutcome::Error(e),
        }
    }
}

/// Ordered solutions without duplicates (by printed form) and without undefined values.
#[derive(Debug, Clone, Default)]
pub struct SolutionSet {
    items: Vec<Expr>,
    seen: HashSet<String>,
}

/// a variable-free candidate must evaluate to a finite number
fn numerically_defined(candidate: &Expr) -> bool {
    if !candidate.variables().is_empty() {
        return true;
    }
    candidate
        .eval_constant()
        .is_ok_and(|z| z.re.is_finite() && z.im.is_finite())
}

impl SolutionSet {
    pub fn new() -> Self {
        SolutionSet::default()
    }

    /// false when the candidate was NaN, undefined or already present
    pub fn add(&mut self, candidate: Expr) -> bool {
        if candidate.is_nan() || !numerically_defined(&candidate) {
            return false;
        }
        if !self.seen.insert(candidate.to_string()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Expr>) {
        for c in candidates {
            self.add(c);
        }
    }

    pub fn merge(&mut self, other: SolutionSet) {
        self.extend(other.items);
    }

    pub fn absorb(&mut self, outcome: StrategyOutcome, strategy: &str) {
        match outcome {
            StrategyOutcome::Found(found) => self.extend(found),
            StrategyOutcome::NotFound => {}
            StrategyOutcome::Error(e) => debug!("{} gave up: {}", strategy, e),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expr> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Expr> {
        self.items
    }

    /// rational results close to n/d*pi (|n| < 10, 0 < d < 10) are replaced by that multiple
    pub fn snap_to_pi(self) -> SolutionSet {
        let mut snapped = SolutionSet::new();
        snapped.extend(
            self.items
                .into_iter()
                .map(|e| pi_multiple(&e).unwrap_or(e)),
        );
        snapped
    }
}

impl From<SolutionSet> for StrategyOutcome {
    fn from(set: SolutionSet) -> Self {
        set.into_vec().into()
    }
}

/// `value` as a small rational multiple of pi, when it is one
pub fn pi_multiple(value: &Expr) -> Option<Expr> {
    let r = value.as_const()?;
    if r.is_zero() {
        return None;
    }
    let ratio = rat_to_f64(r) / std::f64::consts::PI;
    let (n, d) = best_rational_approximation(ratio, PI_MAX_DENOMINATOR, PI_TOLERANCE)?;
    (n != 0 && n.abs() < PI_MAX_DENOMINATOR).then(|| Expr::frac(n, d).times(&Expr::pi()))
}

/// What can be handed to [`Solver::solve_problem`].
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Equation(Equation),
    /// an expression equal to zero
    Expression(Expr),
    System(Vec<Equation>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Values(Vec<Expr>),
    System(SystemSolution),
}

fn is_root_term(term: &Expr, var: &str) -> bool {
    matches!(term, Expr::Func { name: FuncName::sqrt, power, .. } if power.is_one())
        && term.contains_var(var)
}

/// terms holding the variable summed, and the remaining terms
fn separate(expr: &Expr, var: &str) -> (Expr, Vec<Expr>) {
    let (with, without): (Vec<Expr>, Vec<Expr>) =
        expr.terms().into_iter().partition(|t| t.contains_var(var));
    (Expr::sum_from_terms(with), without)
}

/// `d` when every fractional power of the variable has the same denominator `d`
fn fractional_denominator(expr: &Expr, var: &str) -> Option<i64> {
    let denominators: BTreeSet<BigInt> = expr
        .powers_of(var)
        .iter()
        .map(|p: &Rational| p.denom().clone())
        .filter(|d| !d.is_one())
        .collect();
    if denominators.len() != 1 {
        return None;
    }
    denominators.into_iter().next()?.to_i64()
}

/// the candidate makes `expr` vanish: numerically when both are free of other variables,
/// otherwise by exact simplification
fn satisfies(expr: &Expr, var: &str, candidate: &Expr) -> bool {
    let only_var = expr.variables().iter().all(|v| v == var);
    if !only_var || !candidate.variables().is_empty() {
        return expr.substitute(var, candidate).expand().is_zero();
    }
    let Ok(value) = candidate.eval_constant() else {
        return false;
    };
    let bindings = HashMap::from([(var.to_string(), value)]);
    expr.eval_complex(&bindings)
        .is_ok_and(|z| z.norm() <= ROOT_TOLERANCE * value.norm().max(1.0))
}

fn inverse_function(name: FuncName) -> Option<FuncName> {
    match name {
        FuncName::sin => Some(FuncName::asin),
        FuncName::cos => Some(FuncName::acos),
        FuncName::tan => Some(FuncName::atan),
        FuncName::asin => Some(FuncName::sin),
        FuncName::acos => Some(FuncName::cos),
        FuncName::atan => Some(FuncName::tan),
        _ => None,
    }
}

/// Solves equations with a fixed settings snapshot.
#[derive(Debug, Clone)]
pub struct Solver {
    settings: SolveSettings,
}

impl Solver {
    pub fn new(settings: SolveSettings) -> Result<Solver, SolveError> {
        settings.validate()?;
        Ok(Solver { settings })
    }

    pub fn settings(&self) -> &SolveSettings {
        &self.settings
    }

    /// solves "lhs=rhs" (a missing right hand side means zero) for `var`
    pub fn solve(&self, input: &str, var: &str) -> Result<Vec<Expr>, SolveError> {
        let equation = Equation::parse(input)?;
        self.solve_equation(&equation, var)
    }

    pub fn solve_equation(&self, equation: &Equation, var: &str) -> Result<Vec<Expr>, SolveError> {
        if equation.is_zero() {
            return Ok(vec![Expr::c(0)]);
        }
        let found = if equation.lhs.is_var(var) && !equation.rhs.contains_var(var) {
            let mut found = SolutionSet::new();
            found.add(equation.rhs.clone());
            found
        } else if equation.rhs.is_var(var) && !equation.lhs.contains_var(var) {
            let mut found = SolutionSet::new();
            found.add(equation.lhs.clone());
            found
        } else {
            self.solve_at(&equation.to_lhs(), var, 0)
        };
        let has_trig = equation.lhs.has_trig() || equation.rhs.has_trig();
        let found = if has_trig && self.settings.make_pi_conversions {
            found.snap_to_pi()
        } else {
            found
        };
        Ok(found.into_vec())
    }

    /// solves `expr = 0`
    pub fn solve_expr(&self, expr: &Expr, var: &str) -> Result<Vec<Expr>, SolveError> {
        let equation = Equation::new(expr.clone(), Expr::c(0))?;
        self.solve_equation(&equation, var)
    }

    /// systems take all of `vars` (every variable of the system when empty), single
    /// equations the first one (`x` when empty)
    pub fn solve_problem(&self, problem: &Problem, vars: &[&str]) -> Result<Solution, SolveError> {
        let var = vars.first().copied().unwrap_or(DEFAULT_VARIABLE);
        match problem {
            Problem::Equation(equation) => self.solve_equation(equation, var).map(Solution::Values),
            Problem::Expression(expr) => self.solve_expr(expr, var).map(Solution::Values),
            Problem::System(equations) => {
                let exprs: Vec<Expr> = equations.iter().map(|e| e.to_lhs()).collect();
                let names = (!vars.is_empty()).then_some(vars);
                self.solve_system_exprs(&exprs, names).map(Solution::System)
            }
        }
    }

    /// Solves a system given as "lhs=rhs" strings.
    ///
    /// Without `vars` the unknowns are all variables of the system in sorted order: a linear
    /// system is solved exactly, anything else numerically. With `vars` the system must be
    /// linear in them and every other symbol is a parameter.
    pub fn solve_system(&self, equations: &[&str], vars: Option<&[&str]>) -> Result<SystemSolution, SolveError> {
        let exprs = equations
            .iter()
            .map(|s| Equation::parse(s).map(|e| e.to_lhs()))
            .collect::<Result<Vec<Expr>, SolveError>>()?;
        self.solve_system_exprs(&exprs, vars)
    }

    /// system of expressions each equal to zero
    pub fn solve_system_exprs(&self, exprs: &[Expr], vars: Option<&[&str]>) -> Result<SystemSolution, SolveError> {
        let as_object = self.settings.solutions_as_object;
        if let Some(vars) = vars {
            let names: Vec<String> = vars.iter().map(|v| v.to_string()).collect();
            let values = solve_linear_explicit(exprs, &names)?;
            return Ok(SystemSolution::new(&names, values, as_object));
        }
        let names = system_variables(exprs);
        if all_linear(exprs, &names) {
            let values = solve_linear_default(exprs, &names)?;
            return Ok(SystemSolution::new(&names, values, as_object));
        }
        debug!("system is nonlinear in {:?}", names);
        let mut nr = NR::with_settings(&self.settings);
        nr.set_equation_system(exprs.to_vec(), Some(names.clone()));
        match nr.solve() {
            Ok(values) if !values.is_empty() => Ok(SystemSolution::new(&names, values, as_object)),
            Ok(_) => Ok(SystemSolution::empty(as_object)),
            Err(e) => {
                debug!("nonlinear solver gave up: {}", e);
                Ok(SystemSolution::empty(as_object))
            }
        }
    }

    /// `solve` with the logger started at the configured level and the run timed
    pub fn solve_with_logging(&self, input: &str, var: &str) -> Result<Vec<Expr>, SolveError> {
        init_logger(self.settings.level_filter()?, false);
        info!("solving {} for {}", input, var);
        let begin = Instant::now();
        let result = self.solve(input, var);
        match &result {
            Ok(found) => info!("{} solution(s): [{}]", found.len(), found.iter().join(", ")),
            Err(e) => warn!("{}", e),
        }
        info!("time elapsed {:?}", begin.elapsed());
        result
    }

    //////////////////////////////////////////////////////////////////////////////////////////////
    ///                 DISPATCHER
    //////////////////////////////////////////////////////////////////////////////////////////////
    fn solve_at(&self, expr: &Expr, var: &str, depth: usize) -> SolutionSet {
        let mut found = SolutionSet::new();
        if depth > self.settings.max_recursion_depth {
            debug!("{} while solving {}", SolveError::DepthExceeded(depth), expr);
            return found;
        }
        if expr.is_zero() {
            found.add(Expr::c(0));
            return found;
        }
        if !expr.contains_var(var) {
            return found;
        }
        debug!("depth {}: {} = 0 for {}", depth, expr, var);

        match expr {
            Expr::Var { name, power, .. } if name == var => {
                if power.is_positive() {
                    found.add(Expr::c(0));
                }
                return found;
            }
            Expr::Product { factors, .. } => {
                for factor in factors
                    .iter()
                    .filter(|f| f.contains_var(var) && f.power().is_positive())
                {
                    found.merge(self.solve_at(factor, var, depth + 1));
                }
                return found;
            }
            Expr::Func {
                name: FuncName::sqrt,
                args,
                power,
                ..
            } if power.is_positive() => {
                return self.solve_at(&args[0], var, depth + 1);
            }
            _ => {}
        }

        let cleared = Equation {
            lhs: expr.clone(),
            rhs: Expr::c(0),
        }
        .to_lhs();
        if cleared.is_zero() {
            found.add(Expr::c(0));
            return found;
        }
        if !cleared.contains_var(var) {
            return found;
        }
        if let Some(d) = fractional_denominator(&cleared, var) {
            return self.solve_fractional(&cleared, var, d, depth);
        }
        match self.sqrt_solve(&cleared, var, depth) {
            StrategyOutcome::Found(roots) => {
                found.extend(roots);
                return found;
            }
            outcome => found.absorb(outcome, "square root isolation"),
        }

        let vars = cleared.variables();
        if vars.len() == 1 {
            if cleared.is_polynomial_in(var) {
                found.absorb(self.solve_polynomial(&cleared, var, depth), "polynomial");
            } else {
                found.absorb(self.numeric_roots(&cleared, var), "numeric root finder");
            }
            return found;
        }

        if !cleared.has_func_of(var) && cleared.is_composite() {
            match self.solve_by_coefficients(&cleared, var, depth) {
                StrategyOutcome::Found(roots) => {
                    found.extend(roots);
                    return found;
                }
                StrategyOutcome::NotFound => debug!("no closed form for {}", cleared),
                StrategyOutcome::Error(e) => debug!("coefficients gave up: {}", e),
            }
        }
        found.absorb(self.solve_by_rewriting(&cleared, var, depth), "rewriting");
        found
    }

    /// u = x^(1/d): solve in u and raise every root to d. With a single variable, roots that
    /// do not satisfy the original (wrong branch) are dropped.
    fn solve_fractional(&self, expr: &Expr, var: &str, d: i64, depth: usize) -> SolutionSet {
        let substituted = expr.substitute(var, &Expr::var(var).powi(d));
        let check = expr.variables().len() == 1;
        let mut found = SolutionSet::new();
        for root in self.solve_at(&substituted, var, depth + 1).into_vec() {
            let candidate = root.powi(d).expand();
            if !check || satisfies(expr, var, &candidate) {
                found.add(candidate);
            }
        }
        found
    }

    /// square roots moved to one side and both sides squared; only candidates satisfying the
    /// original (or imaginary ones) survive
    fn sqrt_solve(&self, expr: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        if !expr.is_sum() {
            return StrategyOutcome::NotFound;
        }
        let (roots, rest): (Vec<Expr>, Vec<Expr>) =
            expr.terms().into_iter().partition(|t| is_root_term(t, var));
        if roots.is_empty() {
            return StrategyOutcome::NotFound;
        }
        let roots = Expr::sum_from_terms(roots);
        let rest = Expr::sum_from_terms(rest);
        let squared = rest.powi(2).minus(&roots.powi(2)).expand();
        if squared == *expr || !squared.contains_var(var) {
            return StrategyOutcome::NotFound;
        }
        self.solve_at(&squared, var, depth + 1)
            .into_vec()
            .into_iter()
            .filter(|c| c.contains_var(IMAGINARY) || satisfies(expr, var, c))
            .collect::<Vec<_>>()
            .into()
    }

    fn solve_polynomial(&self, expr: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        if let Some(factors) = factor_expression(expr, var) {
            let nonconstant: Vec<&Expr> = factors.iter().filter(|f| f.contains_var(var)).collect();
            if nonconstant.len() > 1 {
                let mut found = SolutionSet::new();
                for factor in nonconstant {
                    found.merge(self.solve_at(factor, var, depth + 1));
                }
                return found.into();
            }
        }
        let coeffs = match expr.coeffs(var) {
            Ok(c) => c,
            Err(e) => return StrategyOutcome::Error(e),
        };
        if let Some(rational) = rational_coeffs(&coeffs) {
            if let Some(roots) = exact_integer_roots(&rational) {
                return roots.into_iter().map(Expr::Const).collect::<Vec<_>>().into();
            }
        }
        let c = &coeffs;
        match c.len() - 1 {
            0 => StrategyOutcome::NotFound,
            1 => vec![linear(&c[0], &c[1])].into(),
            2 => quadratic(&c[0], &c[1], &c[2]).into(),
            3 => cubic(&c[0], &c[1], &c[2], &c[3]).into(),
            _ => numeric_polynomial_roots(expr, var, c),
        }
    }

    fn numeric_roots(&self, expr: &Expr, var: &str) -> StrategyOutcome {
        find_roots(expr, var, &self.settings)
            .map(|roots| {
                roots
                    .into_iter()
                    .filter_map(|r| f64_to_rational(r, ROOT_DIGITS))
                    .map(Expr::Const)
                    .collect::<Vec<Expr>>()
            })
            .into()
    }

    fn solve_by_coefficients(&self, expr: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        let coeffs = match expr.coeffs(var) {
            Ok(c) => c,
            Err(e) => {
                return match self.solve_exponential(expr, var, depth) {
                    StrategyOutcome::NotFound => StrategyOutcome::Error(e),
                    other => other,
                };
            }
        };
        let c = &coeffs;
        match c.len() - 1 {
            0 => StrategyOutcome::NotFound,
            1 => vec![linear(&c[0], &c[1])].into(),
            2 => quadratic(&c[0], &c[1], &c[2]).into(),
            3 => cubic(&c[0], &c[1], &c[2], &c[3]).into(),
            4 => quartic(&c[0], &c[1], &c[2], &c[3], &c[4]).into(),
            n => self.solve_high_degree(c, n, var, depth),
        }
    }

    /// a*x^n + b by complex roots; a power of x common to all terms is split off
    fn solve_high_degree(&self, coeffs: &[Expr], n: usize, var: &str, depth: usize) -> StrategyOutcome {
        if coeffs[1..n].iter().all(|c| c.is_zero()) {
            return csolve(&coeffs[n], &coeffs[0], n).into();
        }
        let zeros = coeffs.iter().take_while(|c| c.is_zero()).count();
        if zeros == 0 {
            return StrategyOutcome::NotFound;
        }
        let mut found = SolutionSet::new();
        found.add(Expr::c(0));
        found.merge(self.solve_at(&from_coeffs(&coeffs[zeros..], var), var, depth + 1));
        found.into()
    }

    /// a*b^f = r with the base free of the variable: f = log(r/a)/log(b)
    fn solve_exponential(&self, expr: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        let (with, without) = separate(expr, var);
        let Expr::Exponential {
            base,
            exponent,
            mult,
        } = &with
        else {
            return StrategyOutcome::NotFound;
        };
        if base.contains_var(var) {
            return StrategyOutcome::NotFound;
        }
        let rhs = Expr::sum_from_terms(without).negate().scale(&mult.recip());
        let value = Expr::log_of(&rhs).divide(&Expr::log_of(base));
        self.solve_at(&exponent.minus(&value), var, depth + 1).into()
    }

    fn solve_by_rewriting(&self, expr: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        match rewrite(expr, &Expr::c(0), var, 0, self.settings.max_recursion_depth) {
            Ok((isolated, other)) => self.solve_isolated(expr, &isolated, &other, var, depth),
            Err(e) => {
                debug!("rewriting {} failed: {}", expr, e);
                after_failed_rewrite(expr, var).unwrap_or(StrategyOutcome::Error(e))
            }
        }
    }

    /// `isolated = other` where `isolated` is a function call or holds the variable bare
    fn solve_isolated(&self, expr: &Expr, isolated: &Expr, other: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        if let Expr::Func {
            name,
            args,
            power,
            mult,
        } = isolated
        {
            if power.is_one() {
                let inner = &args[0];
                let value = other.scale(&mult.recip());
                return match name {
                    FuncName::abs => {
                        let mut found = self.solve_at(&inner.minus(&value), var, depth + 1);
                        found.merge(self.solve_at(&inner.plus(&value), var, depth + 1));
                        found.into()
                    }
                    FuncName::log => {
                        self.solve_at(&inner.minus(&Expr::exp_of(&value)), var, depth + 1).into()
                    }
                    _ => match inverse_function(*name) {
                        Some(inverse) => {
                            self.solve_inverse(inner, &Expr::func(inverse, value), var, depth)
                        }
                        None => StrategyOutcome::NotFound,
                    },
                };
            }
        }
        let reduced = Equation {
            lhs: isolated.clone(),
            rhs: other.clone(),
        }
        .to_lhs();
        if reduced == *expr {
            return StrategyOutcome::Error(SolveError::NoProgress(expr.to_string()));
        }
        self.solve_at(&reduced, var, depth + 1).into()
    }

    /// f(x) = value with f linear gives the root directly, otherwise f(x) - value is solved
    fn solve_inverse(&self, inner: &Expr, value: &Expr, var: &str, depth: usize) -> StrategyOutcome {
        if let Ok(c) = inner.coeffs(var) {
            if c.len() == 2 {
                return vec![value.minus(&c[0]).divide(&c[1]).expand()].into();
            }
        }
        self.solve_at(&inner.minus(value), var, depth + 1).into()
    }
}

/// last resorts when the variable cannot be isolated: a product is zero with the variable,
/// and x^g = r gives r^(1/g)
fn after_failed_rewrite(expr: &Expr, var: &str) -> Option<StrategyOutcome> {
    match expr {
        Expr::Product { .. } => Some(vec![Expr::c(0)].into()),
        Expr::Sum { .. } => {
            let (with, without) = separate(expr, var);
            let Expr::Exponential {
                base,
                exponent,
                mult,
            } = &with
            else {
                return None;
            };
            if !base.is_var(var) || exponent.contains_var(var) {
                return None;
            }
            let rhs = Expr::sum_from_terms(without).negate().scale(&mult.recip());
            Some(vec![rhs.pow_expr(&exponent.powi(-1))].into())
        }
        _ => None,
    }
}

/// numeric roots (complex included) of a polynomial of degree four or more in one variable
fn numeric_polynomial_roots(expr: &Expr, var: &str, coeffs: &[Expr]) -> StrategyOutcome {
    let numeric: Option<Vec<Rational>> = coeffs
        .iter()
        .map(|c| match c.as_const() {
            Some(r) => Some(r.clone()),
            None => c.to_f64().and_then(|v| f64_to_rational(v, 15)),
        })
        .collect();
    let Some(numeric) = numeric else {
        return StrategyOutcome::Error(SolveError::NotPolynomial {
            expr: expr.to_string(),
            var: var.to_string(),
        });
    };
    proots(&numeric)
        .into_iter()
        .filter_map(complex_to_expr)
        .collect::<Vec<_>>()
        .into()
}
