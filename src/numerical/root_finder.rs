//! Numeric roots of a real function of one variable: sign-change scan of a bounded interval,
//! then Newton-Raphson from every candidate point.
use crate::numerical::solve_error::SolveError;
use crate::numerical::solve_settings::SolveSettings;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;

/// a refined point is a root only when the function is this small there
pub const ROOT_TOLERANCE: f64 = 1e-6;
/// significant digits kept of every numeric root
pub const ROOT_DIGITS: usize = 12;

/// distance at which a zero is checked for being an underflow plateau
const PLATEAU_PROBE: f64 = 1.0;

/// f and f' vanish at the point and f stays negligible a unit away on both sides, as e^x
/// does far to the left once it underflows
fn is_plateau(x: f64, f: &dyn Fn(f64) -> f64, fp: &dyn Fn(f64) -> f64) -> bool {
    let small = |v: f64| v.abs() <= ROOT_TOLERANCE;
    small(fp(x)) && small(f(x - PLATEAU_PROBE)) && small(f(x + PLATEAU_PROBE))
}

/// candidate starting points: midpoints of sign changes of `f` sampled at multiples of `step`
/// on both sides of the origin
pub fn get_points(f: &dyn Fn(f64) -> f64, step: f64, settings: &SolveSettings, has_log: bool) -> Vec<f64> {
    let mut points = vec![0.0];
    if has_log {
        points.push(0.1);
    }
    for direction in [1.0, -1.0] {
        let mut found = 0;
        let mut last = f(0.0);
        let mut k = 1.0;
        while k * step <= settings.solve_radius && found < settings.roots_per_side {
            let x = direction * k * step;
            let value = f(x);
            if !value.is_finite() {
                break;
            }
            if value == 0.0 {
                points.push(x);
                found += 1;
            } else if last.is_finite() && last != 0.0 && last.signum() != value.signum() {
                points.push(x - direction * step / 2.0);
                found += 1;
            }
            last = value;
            k += 1.0;
        }
    }
    points
}

/// Newton iteration from `seed`; None when it does not settle within `max_iter` steps
pub fn newton(seed: f64, f: &dyn Fn(f64) -> f64, fp: &dyn Fn(f64) -> f64, max_iter: usize) -> Option<f64> {
    let mut x0 = seed;
    for _ in 0..max_iter {
        let fx = f(x0);
        if fx == 0.0 {
            return Some(x0);
        }
        let x = x0 - fx / fp(x0);
        if !x.is_finite() {
            return None;
        }
        if (x - x0).abs() <= f64::EPSILON * x.abs().max(1.0) {
            return Some(x);
        }
        x0 = x;
    }
    None
}

fn round_significant(x: f64, digits: usize) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    format!("{:.*e}", digits - 1, x).parse().unwrap_or(x)
}

/// real roots of `expr` in `var` found by scanning at three step sizes, sorted ascending
pub fn find_roots(expr: &Expr, var: &str, settings: &SolveSettings) -> Result<Vec<f64>, SolveError> {
    let f = expr.lambdify1D(var)?;
    let fp = expr.diff(var).lambdify1D(var)?;
    let has_log = expr.has_log();
    let mut seeds = Vec::new();
    for step in [settings.step_size, settings.step_size / 2.0, settings.step_size / 10.0] {
        seeds.extend(get_points(&f, step, settings, has_log));
    }
    seeds.sort_by(|a, b| a.total_cmp(b));
    seeds.dedup();
    debug!("{} starting points for {}", seeds.len(), expr);

    let mut roots: Vec<f64> = Vec::new();
    for seed in seeds {
        let Some(root) = newton(seed, &f, &fp, settings.max_newton_iterations) else {
            continue;
        };
        if f(root).abs() > ROOT_TOLERANCE || is_plateau(root, &f, &fp) {
            continue;
        }
        // -0.0 and 0.0 are the same root
        let root = round_significant(root, ROOT_DIGITS) + 0.0;
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots.sort_by(|a, b| a.total_cmp(b));
    Ok(roots)
}
