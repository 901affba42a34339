use crate::symbolic::symbolic_engine::{Expr, FuncName};
use crate::symbolic::utils::{Rational, rat};
use num::One;

impl Expr {
    /// analytical derivative with respect to `var`
    pub fn diff(&self, var: &str) -> Expr {
        if !self.contains_var(var) {
            return Expr::c(0);
        }
        match self {
            Expr::Const(_) => Expr::c(0),
            Expr::Var { name, power, mult } => {
                if name == var {
                    // d(m*x^p) = m*p*x^(p-1)
                    Expr::var(name)
                        .powr(&(power - Rational::one()))
                        .scale(&(mult * power))
                } else {
                    Expr::c(0)
                }
            }
            Expr::Sum { terms, power, mult } => {
                let inner_derivative =
                    Expr::sum_from_terms(terms.iter().map(|t| t.diff(var)).collect());
                if power.is_one() {
                    inner_derivative
                } else {
                    let base = Expr::sum_from_terms(terms.clone());
                    base.powr(&(power - Rational::one()))
                        .times(&inner_derivative)
                        .scale(&(mult * power))
                }
            }
            Expr::Product { factors, mult } => {
                // product rule
                let mut terms = Vec::with_capacity(factors.len());
                for (k, factor) in factors.iter().enumerate() {
                    let d = factor.diff(var);
                    if d.is_zero() {
                        continue;
                    }
                    let rest = factors
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != k)
                        .fold(d, |acc, (_, f)| acc.times(f));
                    terms.push(rest);
                }
                Expr::sum_from_terms(terms).scale(mult)
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let u = &args[0];
                let outer = func_derivative(*name, u).times(&u.diff(var));
                if power.is_one() {
                    outer.scale(mult)
                } else {
                    let f = Expr::func(*name, u.clone());
                    f.powr(&(power - Rational::one()))
                        .times(&outer)
                        .scale(&(mult * power))
                }
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => {
                // d(b^g) = b^g * (g' * ln(b) + g * b'/b)
                let value = self.unit();
                let from_exponent = if exponent.contains_var(var) {
                    exponent.diff(var).times(&Expr::log_of(base))
                } else {
                    Expr::c(0)
                };
                let from_base = if base.contains_var(var) {
                    exponent.times(&base.diff(var)).divide(base)
                } else {
                    Expr::c(0)
                };
                value.times(&from_exponent.plus(&from_base)).scale(mult)
            }
        }
    }

    /// vector of partial derivatives with respect to every variable of the expression
    pub fn diff_multi(&self) -> Vec<Expr> {
        self.variables().iter().map(|v| self.diff(v)).collect()
    }
}

/// f'(u) for each supported function
fn func_derivative(name: FuncName, u: &Expr) -> Expr {
    let one_minus_u2 = Expr::c(1).minus(&u.powi(2));
    match name {
        FuncName::sin => Expr::func(FuncName::cos, u.clone()),
        FuncName::cos => Expr::func(FuncName::sin, u.clone()).negate(),
        FuncName::tan => Expr::func(FuncName::cos, u.clone()).powi(-2),
        FuncName::cot => Expr::func(FuncName::sin, u.clone()).powi(-2).negate(),
        FuncName::sec => Expr::func(FuncName::sec, u.clone()).times(&Expr::func(FuncName::tan, u.clone())),
        FuncName::csc => Expr::func(FuncName::csc, u.clone())
            .times(&Expr::func(FuncName::cot, u.clone()))
            .negate(),
        FuncName::asin => one_minus_u2.powr(&rat(-1, 2)),
        FuncName::acos => one_minus_u2.powr(&rat(-1, 2)).negate(),
        FuncName::atan => Expr::c(1).plus(&u.powi(2)).powi(-1),
        FuncName::log => u.powi(-1),
        FuncName::sqrt => Expr::sqrt_of(u).powi(-1).scale(&rat(1, 2)),
        FuncName::abs => u.divide(&Expr::func(FuncName::abs, u.clone())),
    }
}
