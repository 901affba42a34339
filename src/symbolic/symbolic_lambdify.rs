//! Turning symbolic expressions into ordinary Rust closures, and complex-valued evaluation
//! for checking candidate solutions that involve `i`.
use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::{EULER, Expr, FuncName, IMAGINARY, NAN_SYMBOL, PI};
use crate::symbolic::utils::{Rational, rat_to_f64, rat_to_i64};
use num::Integer;
use num_complex::Complex64;
use std::collections::HashMap;

pub type LambdaFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// rational exponent prepared once at compile time
#[derive(Clone, Copy, Debug)]
enum RealPower {
    One,
    Int(i32),
    // exponent, denominator odd, numerator odd
    Frac(f64, bool, bool),
}

impl RealPower {
    fn new(p: &Rational) -> Self {
        match rat_to_i64(p).and_then(|n| i32::try_from(n).ok()) {
            Some(1) => RealPower::One,
            Some(n) => RealPower::Int(n),
            None => RealPower::Frac(rat_to_f64(p), p.denom().is_odd(), p.numer().is_odd()),
        }
    }

    /// real branch for odd roots of negative numbers
    fn apply(&self, x: f64) -> f64 {
        match *self {
            RealPower::One => x,
            RealPower::Int(n) => x.powi(n),
            RealPower::Frac(pf, odd_denom, odd_numer) => {
                if x < 0.0 && odd_denom {
                    let magnitude = (-x).powf(pf);
                    if odd_numer { -magnitude } else { magnitude }
                } else {
                    x.powf(pf)
                }
            }
        }
    }
}

fn apply_real(name: FuncName, u: f64) -> f64 {
    match name {
        FuncName::sin => u.sin(),
        FuncName::cos => u.cos(),
        FuncName::tan => u.tan(),
        FuncName::cot => 1.0 / u.tan(),
        FuncName::sec => 1.0 / u.cos(),
        FuncName::csc => 1.0 / u.sin(),
        FuncName::asin => u.asin(),
        FuncName::acos => u.acos(),
        FuncName::atan => u.atan(),
        FuncName::log => u.ln(),
        FuncName::sqrt => u.sqrt(),
        FuncName::abs => u.abs(),
    }
}

fn apply_complex(name: FuncName, u: Complex64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    match name {
        FuncName::sin => u.sin(),
        FuncName::cos => u.cos(),
        FuncName::tan => u.tan(),
        FuncName::cot => one / u.tan(),
        FuncName::sec => one / u.cos(),
        FuncName::csc => one / u.sin(),
        FuncName::asin => u.asin(),
        FuncName::acos => u.acos(),
        FuncName::atan => u.atan(),
        FuncName::log => u.ln(),
        FuncName::sqrt => u.sqrt(),
        FuncName::abs => Complex64::new(u.norm(), 0.0),
    }
}

fn complex_pow(z: Complex64, p: Complex64) -> Complex64 {
    if p.im == 0.0 && p.re.fract() == 0.0 && p.re.abs() < i32::MAX as f64 {
        return z.powi(p.re as i32);
    }
    if z.norm() == 0.0 {
        return if p.re > 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(f64::NAN, f64::NAN)
        };
    }
    z.powc(p)
}

impl Expr {
    /// compiles into a closure over the values of `vars` (in that order)
    pub fn lambdify1(&self, vars: &[&str]) -> Result<LambdaFn, SolveError> {
        match self {
            Expr::Const(c) => {
                let val = rat_to_f64(c);
                Ok(Box::new(move |_| val))
            }
            Expr::Var { name, power, mult } => {
                let m = rat_to_f64(mult);
                let p = RealPower::new(power);
                let fixed = match name.as_str() {
                    PI => Some(std::f64::consts::PI),
                    EULER => Some(std::f64::consts::E),
                    NAN_SYMBOL => Some(f64::NAN),
                    IMAGINARY => {
                        return Err(SolveError::Compile(
                            "imaginary unit in a real function".to_string(),
                        ));
                    }
                    _ => None,
                };
                if let Some(value) = fixed {
                    let v = m * p.apply(value);
                    return Ok(Box::new(move |_| v));
                }
                let index = vars
                    .iter()
                    .position(|&x| x == name.as_str())
                    .ok_or_else(|| SolveError::Compile(format!("unknown variable {}", name)))?;
                Ok(Box::new(move |args| m * p.apply(args[index])))
            }
            Expr::Product { factors, mult } => {
                let m = rat_to_f64(mult);
                let compiled = factors
                    .iter()
                    .map(|f| f.lambdify1(vars))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(move |args| {
                    compiled.iter().fold(m, |acc, f| acc * f(args))
                }))
            }
            Expr::Sum { terms, power, mult } => {
                let m = rat_to_f64(mult);
                let p = RealPower::new(power);
                let compiled = terms
                    .iter()
                    .map(|t| t.lambdify1(vars))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(move |args| {
                    let s: f64 = compiled.iter().map(|f| f(args)).sum();
                    m * p.apply(s)
                }))
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let m = rat_to_f64(mult);
                let p = RealPower::new(power);
                let name = *name;
                let inner = args[0].lambdify1(vars)?;
                Ok(Box::new(move |a| m * p.apply(apply_real(name, inner(a)))))
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => {
                let m = rat_to_f64(mult);
                let b = base.lambdify1(vars)?;
                let g = exponent.lambdify1(vars)?;
                Ok(Box::new(move |a| m * b(a).powf(g(a))))
            }
        }
    }

    pub fn lambdify_borrowed_thread_safe(&self, vars: &[&str]) -> Result<LambdaFn, SolveError> {
        self.lambdify1(vars)
    }

    /// closure of a single variable
    pub fn lambdify1D(&self, var: &str) -> Result<Box<dyn Fn(f64) -> f64 + Send + Sync>, SolveError> {
        let compiled = self.lambdify1(&[var])?;
        Ok(Box::new(move |x| compiled(&[x])))
    }

    /// evaluates with complex arithmetic (principal branches); every variable must be bound
    pub fn eval_complex(&self, bindings: &HashMap<String, Complex64>) -> Result<Complex64, SolveError> {
        let value = match self {
            Expr::Const(c) => Complex64::new(rat_to_f64(c), 0.0),
            Expr::Var { name, power, mult } => {
                let base = match name.as_str() {
                    PI => Complex64::new(std::f64::consts::PI, 0.0),
                    EULER => Complex64::new(std::f64::consts::E, 0.0),
                    IMAGINARY => Complex64::new(0.0, 1.0),
                    NAN_SYMBOL => Complex64::new(f64::NAN, f64::NAN),
                    _ => *bindings
                        .get(name)
                        .ok_or_else(|| SolveError::Compile(format!("unbound variable {}", name)))?,
                };
                complex_pow(base, Complex64::new(rat_to_f64(power), 0.0)) * rat_to_f64(mult)
            }
            Expr::Product { factors, mult } => {
                let mut acc = Complex64::new(rat_to_f64(mult), 0.0);
                for f in factors {
                    acc *= f.eval_complex(bindings)?;
                }
                acc
            }
            Expr::Sum { terms, power, mult } => {
                let mut acc = Complex64::new(0.0, 0.0);
                for t in terms {
                    acc += t.eval_complex(bindings)?;
                }
                complex_pow(acc, Complex64::new(rat_to_f64(power), 0.0)) * rat_to_f64(mult)
            }
            Expr::Func {
                name,
                args,
                power,
                mult,
            } => {
                let u = args[0].eval_complex(bindings)?;
                complex_pow(apply_complex(*name, u), Complex64::new(rat_to_f64(power), 0.0))
                    * rat_to_f64(mult)
            }
            Expr::Exponential {
                base,
                exponent,
                mult,
            } => {
                let b = base.eval_complex(bindings)?;
                let g = exponent.eval_complex(bindings)?;
                complex_pow(b, g) * rat_to_f64(mult)
            }
        };
        Ok(value)
    }

    /// numeric value of an expression without unknowns
    pub fn eval_constant(&self) -> Result<Complex64, SolveError> {
        self.eval_complex(&HashMap::new())
    }

    /// real value of an expression without unknowns, None when complex or not finite
    pub fn to_f64(&self) -> Option<f64> {
        let z = self.eval_constant().ok()?;
        if z.re.is_finite() && z.im.abs() <= 1e-12 * z.re.abs().max(1.0) {
            Some(z.re)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify_multivariate() {
        let f = Expr::parse_expression("x^2+y*sin(x)-log(y)").unwrap();
        let compiled = f.lambdify1(&["x", "y"]).unwrap();
        let expected = 1.5_f64.powi(2) + 2.0 * 1.5_f64.sin() - 2.0_f64.ln();
        assert_relative_eq!(compiled(&[1.5, 2.0]), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_real_cube_root() {
        let f = Expr::parse_expression("x^(1/3)").unwrap();
        let compiled = f.lambdify1D("x").unwrap();
        assert_relative_eq!(compiled(-8.0), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_rejects_imaginary_and_unknown() {
        let f = Expr::parse_expression("x+i").unwrap();
        assert!(f.lambdify1(&["x"]).is_err());
        let g = Expr::parse_expression("x+y").unwrap();
        assert!(g.lambdify1(&["x"]).is_err());
    }

    #[test]
    fn test_eval_complex() {
        let f = Expr::parse_expression("x^2+1").unwrap();
        let mut bindings = HashMap::new();
        bindings.insert("x".to_string(), Complex64::new(0.0, 1.0));
        let value = f.eval_complex(&bindings).unwrap();
        assert!(value.norm() < 1e-12);
        let s = Expr::parse_expression("sqrt(-4)").unwrap();
        let z = s.eval_constant().unwrap();
        assert_relative_eq!(z.im, 2.0, epsilon = 1e-12);
        assert_eq!(Expr::parse_expression("2*pi").unwrap().to_f64(), Some(2.0 * std::f64::consts::PI));
    }
}
