//! Solver configuration: an immutable snapshot handed to every solve.
use crate::numerical::solve_error::SolveError;
use log::LevelFilter;

/// All tunables of the solver.
///
/// # Example
/// ```
/// use RustedSolve::numerical::solve_settings::SolveSettings;
/// let settings = SolveSettings::from_toml_str("solve_radius = 50.0\nroots_per_side = 4").unwrap();
/// assert_eq!(settings.solve_radius, 50.0);
/// assert_eq!(settings.roots_per_side, 4);
/// assert_eq!(settings.max_newton_iterations, 200);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolveSettings {
    /// half-width of the interval scanned for sign changes
    pub solve_radius: f64,
    /// max candidate points collected on each side of the origin
    pub roots_per_side: usize,
    /// snap numeric results to rational multiples of pi when trig functions are present
    pub make_pi_conversions: bool,
    /// coarsest scan step, refined to half and a tenth of it
    pub step_size: f64,
    pub max_newton_iterations: usize,
    /// restarts allowed in the nonlinear system solver
    pub max_non_linear_tries: i64,
    /// iteration after which a diverging nonlinear run is restarted
    pub non_linear_jump_at: usize,
    pub non_linear_jump_size: f64,
    /// seed value for every unknown of a nonlinear system
    pub non_linear_start: f64,
    /// systems return a name -> value map instead of ordered pairs
    pub solutions_as_object: bool,
    pub max_recursion_depth: usize,
    /// "off", "error", "warn", "info", "debug", "trace"
    pub loglevel: Option<String>,
}

impl Default for SolveSettings {
    fn default() -> Self {
        SolveSettings {
            solve_radius: 1000.0,
            roots_per_side: 10,
            make_pi_conversions: true,
            step_size: 0.1,
            max_newton_iterations: 200,
            max_non_linear_tries: 12,
            non_linear_jump_at: 50,
            non_linear_jump_size: 100.0,
            non_linear_start: 0.01,
            solutions_as_object: false,
            max_recursion_depth: 24,
            loglevel: Some("info".to_string()),
        }
    }
}

fn invalid(msg: impl Into<String>) -> SolveError {
    SolveError::InvalidSettings(msg.into())
}

impl SolveSettings {
    pub fn new() -> Self {
        Self::default()
    }

    ////////////////////////////SETTERS///////////////////////////////////////
    pub fn set_solve_radius(mut self, radius: f64) -> Self {
        self.solve_radius = radius;
        self
    }

    pub fn set_roots_per_side(mut self, n: usize) -> Self {
        self.roots_per_side = n;
        self
    }

    pub fn set_pi_conversions(mut self, on: bool) -> Self {
        self.make_pi_conversions = on;
        self
    }

    pub fn set_step_size(mut self, step: f64) -> Self {
        self.step_size = step;
        self
    }

    pub fn set_max_newton_iterations(mut self, n: usize) -> Self {
        self.max_newton_iterations = n;
        self
    }

    pub fn set_non_linear(mut self, tries: i64, jump_at: usize, jump_size: f64, start: f64) -> Self {
        self.max_non_linear_tries = tries;
        self.non_linear_jump_at = jump_at;
        self.non_linear_jump_size = jump_size;
        self.non_linear_start = start;
        self
    }

    pub fn set_solutions_as_object(mut self, on: bool) -> Self {
        self.solutions_as_object = on;
        self
    }

    pub fn set_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn set_loglevel(mut self, level: Option<&str>) -> Self {
        self.loglevel = level.map(|s| s.to_string());
        self
    }

    /// checks ranges; every solve entry point calls this before doing any work
    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.solve_radius.is_finite() && self.solve_radius > 0.0) {
            return Err(invalid(format!("solve_radius must be positive, got {}", self.solve_radius)));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(invalid(format!("step_size must be positive, got {}", self.step_size)));
        }
        if self.step_size > self.solve_radius {
            return Err(invalid("step_size larger than solve_radius"));
        }
        if self.max_newton_iterations == 0 {
            return Err(invalid("max_newton_iterations must be at least 1"));
        }
        if !self.non_linear_jump_size.is_finite() || !self.non_linear_start.is_finite() {
            return Err(invalid("nonlinear jump size and start must be finite"));
        }
        if self.max_recursion_depth == 0 {
            return Err(invalid("max_recursion_depth must be at least 1"));
        }
        self.level_filter()?;
        Ok(())
    }

    /// log level as a simplelog filter
    pub fn level_filter(&self) -> Result<LevelFilter, SolveError> {
        match self.loglevel.as_deref() {
            None | Some("off") | Some("none") => Ok(LevelFilter::Off),
            Some("error") => Ok(LevelFilter::Error),
            Some("warn") => Ok(LevelFilter::Warn),
            Some("info") => Ok(LevelFilter::Info),
            Some("debug") => Ok(LevelFilter::Debug),
            Some("trace") => Ok(LevelFilter::Trace),
            Some(other) => Err(invalid(format!("unknown loglevel '{}'", other))),
        }
    }

    /// reads settings from a TOML document; keys not present keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, SolveError> {
        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| invalid(format!("bad TOML: {}", e)))?;
        let mut s = SolveSettings::default();
        for (key, value) in table.iter() {
            let as_float = || {
                value
                    .as_float()
                    .or_else(|| value.as_integer().map(|i| i as f64))
                    .ok_or_else(|| invalid(format!("{} must be a number", key)))
            };
            let as_uint = || {
                value
                    .as_integer()
                    .filter(|i| *i >= 0)
                    .map(|i| i as usize)
                    .ok_or_else(|| invalid(format!("{} must be a non-negative integer", key)))
            };
            let as_bool = || {
                value
                    .as_bool()
                    .ok_or_else(|| invalid(format!("{} must be true or false", key)))
            };
            match key.as_str() {
                "solve_radius" => s.solve_radius = as_float()?,
                "roots_per_side" => s.roots_per_side = as_uint()?,
                "make_pi_conversions" => s.make_pi_conversions = as_bool()?,
                "step_size" => s.step_size = as_float()?,
                "max_newton_iterations" => s.max_newton_iterations = as_uint()?,
                "max_non_linear_tries" => {
                    s.max_non_linear_tries = value
                        .as_integer()
                        .ok_or_else(|| invalid("max_non_linear_tries must be an integer"))?
                }
                "non_linear_jump_at" => s.non_linear_jump_at = as_uint()?,
                "non_linear_jump_size" => s.non_linear_jump_size = as_float()?,
                "non_linear_start" => s.non_linear_start = as_float()?,
                "solutions_as_object" => s.solutions_as_object = as_bool()?,
                "max_recursion_depth" => s.max_recursion_depth = as_uint()?,
                "loglevel" => {
                    s.loglevel = Some(
                        value
                            .as_str()
                            .ok_or_else(|| invalid("loglevel must be a string"))?
                            .to_string(),
                    )
                }
                other => return Err(invalid(format!("unknown setting '{}'", other))),
            }
        }
        s.validate()?;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = SolveSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.solve_radius, 1000.0);
        assert_eq!(s.roots_per_side, 10);
        assert_eq!(s.max_non_linear_tries, 12);
        assert_eq!(s.non_linear_jump_at, 50);
        assert_eq!(s.non_linear_start, 0.01);
    }

    #[test]
    fn test_from_toml() {
        let s = SolveSettings::from_toml_str(
            "make_pi_conversions = false\nsolutions_as_object = true\nstep_size = 0.2\nloglevel = \"warn\"",
        )
        .unwrap();
        assert!(!s.make_pi_conversions);
        assert!(s.solutions_as_object);
        assert_eq!(s.step_size, 0.2);
        assert_eq!(s.level_filter().unwrap(), LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(SolveSettings::from_toml_str("solve_radius = -1.0").is_err());
        assert!(SolveSettings::from_toml_str("unknown_key = 1").is_err());
        assert!(SolveSettings::from_toml_str("roots_per_side = \"ten\"").is_err());
        assert!(SolveSettings::default().set_loglevel(Some("loud")).validate().is_err());
        assert!(SolveSettings::default().set_step_size(0.0).validate().is_err());
    }
}
