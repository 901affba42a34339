//! Newton-Raphson for systems of nonlinear equations.
//!
//! The Jacobian is built symbolically and compiled once; every run starts from the same value in
//! all components. A run that has not settled after `jump_at` iterations (or meets a singular
//! Jacobian) is abandoned and the start point jumps, alternating sides of the original seed.
///  Example#1
/// ```
/// use RustedSolve::numerical::NR::NR;
/// use RustedSolve::numerical::solve_settings::SolveSettings;
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// let eq_system = Expr::parse_vector_expression(vec!["x*y-6", "x-y+1"]).unwrap();
/// let mut NR_instance = NR::with_settings(&SolveSettings::default().set_loglevel(None));
/// NR_instance.set_equation_system(eq_system, None);
/// let solution = NR_instance.solve().unwrap();
/// let (x, y) = (solution[0].to_f64().unwrap(), solution[1].to_f64().unwrap());
/// assert!((x * y - 6.0).abs() < 1e-10 && (x - y + 1.0).abs() < 1e-10);
///  ```
use crate::numerical::linear_system::system_variables;
use crate::numerical::solve_error::SolveError;
use crate::numerical::solve_settings::SolveSettings;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_functions::Jacobian;
use crate::symbolic::utils::parse_decimal;
use log::{debug, info, warn};
use nalgebra::DVector;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// decimal places kept in the reported solution
pub const RESULT_DECIMALS: usize = 14;

/// how a single run from one starting point ended
#[derive(Debug, Clone, PartialEq)]
enum Run {
    Converged(DVector<f64>),
    /// the start point is abandoned and another one is tried
    Diverged,
    /// the iteration cap was hit
    Exhausted,
}

/// start point of the next run: alternate sides of the seed, moving further out each time.
/// Halfway through the tries the start is reset to zero.
pub fn next_start(tries: i64, halfway: i64, start: f64, jump_size: f64) -> f64 {
    let base = if tries == halfway { 0.0 } else { start };
    let sign = if tries > halfway { 1.0 } else { -1.0 };
    let n = (tries % halfway) + 1;
    base + sign * n as f64 * jump_size
}

pub struct NR {
    pub jacobian: Jacobian, // symbolic jacobian, compiled jacobian and compiled equations
    pub eq_system: Vec<Expr>, // vector of equations, each equal to zero
    pub values: Vec<String>,  // vector of unknowns
    pub max_iterations: usize, // iteration cap of a single run
    pub max_tries: i64,       // number of restarts allowed
    pub jump_at: usize,       // iteration from which a run may be abandoned
    pub jump_size: f64,       // step between start points
    pub start: f64,           // first start point, the same for every unknown

    pub i: usize,        // iteration counter over all runs
    pub restarts: usize, // abandoned runs
    pub result: Option<DVector<f64>>,
}

impl Default for NR {
    fn default() -> Self {
        NR::with_settings(&SolveSettings::default())
    }
}

impl NR {
    pub fn new() -> NR {
        NR::default()
    }

    pub fn with_settings(settings: &SolveSettings) -> NR {
        NR {
            jacobian: Jacobian::new(),
            eq_system: Vec::new(),
            values: Vec::new(),
            max_iterations: settings.max_newton_iterations,
            max_tries: settings.max_non_linear_tries,
            jump_at: settings.non_linear_jump_at,
            jump_size: settings.non_linear_jump_size,
            start: settings.non_linear_start,
            i: 0,
            restarts: 0,
            result: None,
        }
    }

    /// equations and unknowns; without an explicit list the unknowns are all variables of the
    /// system in sorted order
    pub fn set_equation_system(&mut self, eq_system: Vec<Expr>, values: Option<Vec<String>>) {
        self.values = values.unwrap_or_else(|| system_variables(&eq_system));
        self.eq_system = eq_system;
        self.result = None;
    }

    /// symbolic jacobian and numeric closures for it and the equations
    pub fn eq_generate(&mut self) -> Result<(), SolveError> {
        let mut jacobian = Jacobian::from_vectors(self.eq_system.clone(), self.values.clone());
        jacobian.calc_jacobian();
        jacobian.jacobian_generate()?;
        jacobian.lambdify_funcvector()?;
        debug!("symbolic jacobian {:?}", jacobian.readable_jacobian());
        self.jacobian = jacobian;
        Ok(())
    }

    /// Newton correction -J(x)^-1 * f(x); None for a singular jacobian or a non-finite value
    pub fn iteration(&self, x: &DVector<f64>) -> Option<DVector<f64>> {
        let point = x.as_slice();
        let jac = self.jacobian.evaluate_func_jacobian_DMatrix(point);
        let fun_vector = self.jacobian.evaluate_funvector_lambdified_DVector(point);
        let inverse = jac.try_inverse()?;
        let y = -(inverse * fun_vector);
        y.iter().all(|v| v.is_finite()).then_some(y)
    }

    fn run_from(&mut self, start: f64) -> Run {
        let n = self.values.len();
        let mut x = DVector::from_element(n, start);
        let mut y_prev = DVector::<f64>::zeros(n);
        let mut norm = f64::NAN;
        let mut iters = 0;
        loop {
            if iters > self.max_iterations {
                return Run::Exhausted;
            }
            let Some(y) = self.iteration(&x) else {
                return Run::Diverged;
            };
            let d = y
                .iter()
                .zip(y_prev.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            x += &y;
            y_prev = y;
            if iters >= self.jump_at && norm > 1.0 {
                return Run::Diverged;
            }
            let last_norm = norm;
            iters += 1;
            self.i += 1;
            norm = d;
            if norm == last_norm || norm < f64::EPSILON {
                return Run::Converged(x);
            }
        }
    }

    /// runs from successive start points until one converges or the tries run out
    pub fn main_loop(&mut self) -> Option<DVector<f64>> {
        let halfway = (self.max_tries / 2).max(1);
        let mut tries = self.max_tries;
        let mut start = self.start;
        while tries >= 0 {
            match self.run_from(start) {
                Run::Converged(x) => {
                    info!("converged after {} iterations", self.i);
                    return Some(x);
                }
                Run::Exhausted => {
                    warn!("maximum number of iterations {} reached", self.max_iterations);
                    return None;
                }
                Run::Diverged => {
                    start = next_start(tries, halfway, start, self.jump_size);
                    tries -= 1;
                    self.restarts += 1;
                    debug!("restarting from {}, {} tries left", start, tries);
                }
            }
        }
        warn!("no convergence after {} restarts", self.restarts);
        None
    }

    /// solves the system; an empty vector when no start point converged
    pub fn solve(&mut self) -> Result<Vec<Expr>, SolveError> {
        let begin = Instant::now();
        self.eq_generate()?;
        self.result = self.main_loop();
        let end = begin.elapsed();
        self.calc_statistics(end.as_secs_f64());
        Ok(self.get_solution())
    }

    pub fn get_result(&self) -> Option<DVector<f64>> {
        self.result.clone()
    }

    /// the result as exact decimals rounded to 14 places
    pub fn get_solution(&self) -> Vec<Expr> {
        let Some(result) = &self.result else {
            return Vec::new();
        };
        let rounded: Option<Vec<Expr>> = result
            .iter()
            .map(|v| parse_decimal(&format!("{:.*}", RESULT_DECIMALS, v)).map(Expr::Const))
            .collect();
        rounded.unwrap_or_default()
    }

    fn calc_statistics(&self, seconds: f64) {
        let mut builder = Builder::default();
        builder.push_record(["number of equations".to_string(), self.eq_system.len().to_string()]);
        builder.push_record(["unknowns".to_string(), self.values.join(", ")]);
        builder.push_record(["number of iterations".to_string(), self.i.to_string()]);
        builder.push_record(["restarts".to_string(), self.restarts.to_string()]);
        builder.push_record(["time elapsed, s".to_string(), format!("{:.6}", seconds)]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        info!("\n \n CALC STATISTICS \n \n {}", table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quiet() -> SolveSettings {
        SolveSettings::default().set_loglevel(None)
    }

    #[test]
    fn test_NR_set_equation_system() {
        let mut nr = NR::with_settings(&quiet());
        let eqs = Expr::parse_vector_expression(vec!["y^2+x^2-10", "x-y-4"]).unwrap();
        nr.set_equation_system(eqs, None);
        assert_eq!(nr.values, vec!["x".to_string(), "y".to_string()]);
        nr.eq_generate().unwrap();
        assert_eq!(
            nr.jacobian.readable_jacobian(),
            vec![
                vec!["2*x".to_string(), "2*y".to_string()],
                vec!["1".to_string(), "-1".to_string()]
            ]
        );
    }

    #[test]
    fn test_circle_and_line() {
        let mut nr = NR::with_settings(&quiet());
        let eqs = Expr::parse_vector_expression(vec!["x^2+y^2-1", "x-y"]).unwrap();
        nr.set_equation_system(eqs, None);
        let solution = nr.solve().unwrap();
        assert_eq!(solution.len(), 2);
        let x = solution[0].to_f64().unwrap();
        let y = solution[1].to_f64().unwrap();
        assert_relative_eq!(x.abs(), 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(x, y, epsilon = 1e-12);
    }

    #[test]
    fn test_product_and_difference() {
        let mut nr = NR::with_settings(&quiet());
        let eqs = Expr::parse_vector_expression(vec!["x*y-6", "x-y+1"]).unwrap();
        nr.set_equation_system(eqs, None);
        let result = nr.solve().unwrap();
        let x = result[0].to_f64().unwrap();
        let y = result[1].to_f64().unwrap();
        // (2, 3) or (-3, -2)
        assert_relative_eq!(x * y, 6.0, epsilon = 1e-10);
        assert_relative_eq!(y - x, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_symmetric_start_is_singular() {
        // every start point has x == y where the jacobian of this system is singular
        let settings = quiet().set_non_linear(2, 10, 10.0, 0.01);
        let mut nr = NR::with_settings(&settings);
        let eqs = Expr::parse_vector_expression(vec!["x*y-6", "x+y-5"]).unwrap();
        nr.set_equation_system(eqs, None);
        assert!(nr.solve().unwrap().is_empty());
        assert_eq!(nr.restarts, 3);
    }

    #[test]
    fn test_no_real_solution_gives_nothing() {
        let settings = quiet().set_non_linear(4, 10, 10.0, 0.01);
        let mut nr = NR::with_settings(&settings);
        let eqs = Expr::parse_vector_expression(vec!["x^2+y^2+1", "x-y"]).unwrap();
        nr.set_equation_system(eqs, None);
        assert!(nr.solve().unwrap().is_empty());
        assert!(nr.restarts > 0);
    }

    #[test]
    fn test_restart_schedule() {
        // 12 tries, halfway 6: +7, +6, ... on the first half, reset at 6, then the other side
        assert_relative_eq!(next_start(12, 6, 0.01, 100.0), 100.01, epsilon = 1e-12);
        assert_eq!(next_start(7, 6, 500.0, 100.0), 700.0);
        assert_eq!(next_start(6, 6, 700.0, 100.0), -100.0);
        assert_eq!(next_start(5, 6, -100.0, 100.0), -700.0);
        // tries below two never divide by zero
        assert_eq!(next_start(1, 1, 0.0, 1.0), -1.0);
    }
}
