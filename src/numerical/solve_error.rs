//! Errors raised while parsing, rewriting and solving equations.
use thiserror::Error;

/// Everything that can go wrong on the way from a string to a set of solutions.
///
/// Only `Contradiction`, `SingularSystem`, `Parse`, `NonLinearTerm` and `InvalidSettings`
/// ever reach the caller of a top-level solve. The remaining variants are produced by
/// individual strategies; the dispatcher logs them and tries the next strategy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// Both sides of an equation are distinct constants (`1=2`), or exactly one side is `i`
    #[error("contradiction: {0}")]
    Contradiction(String),
    /// Linear system without a unique solution
    #[error("{0}")]
    SingularSystem(String),
    /// The input string is not a valid expression or equation
    #[error("failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },
    /// A term contains more than one of the listed unknowns
    #[error("system must be linear, term '{0}' is not")]
    NonLinearTerm(String),
    /// Expression contains something that cannot be turned into a numeric function
    #[error("cannot compile expression: {0}")]
    Compile(String),
    /// The rewriter could not move anything to the other side
    #[error("cannot isolate variable in '{0}'")]
    CannotIsolate(String),
    /// A rewriting step returned the equation it was given
    #[error("rewriting made no progress on '{0}'")]
    NoProgress(String),
    /// Coefficient extraction asked for on something that is not a polynomial
    #[error("'{expr}' is not a polynomial in {var}")]
    NotPolynomial { expr: String, var: String },
    /// Solver configuration out of range or malformed
    #[error("invalid solver settings: {0}")]
    InvalidSettings(String),
    /// Recursion bound reached
    #[error("maximum recursion depth {0} exceeded")]
    DepthExceeded(usize),
}

impl SolveError {
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        SolveError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
