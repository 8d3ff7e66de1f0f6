//! Error type for the simulation library.
//!
//! Every precondition the kernel relies on is checked at the call site and
//! reported through [`NbodyError`]; nothing is silently clamped or skipped.

use std::fmt;

pub type Result<T> = std::result::Result<T, NbodyError>;

#[derive(Debug)]
pub enum NbodyError {
    /// Index outside `[0, len)` of the body store
    IndexOutOfBounds { index: usize, len: usize },
    /// Parallel inputs whose lengths disagree (bulk load, flat buffers)
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    /// Mass that is zero, negative, or not finite
    InvalidMass { index: usize, mass: f64 },
    /// Worker count of zero
    InvalidThreadCount(usize),
    /// Benchmark asked to time zero steps
    InvalidStepCount(usize),
    /// Step parameter outside its valid domain
    InvalidParameter { name: &'static str, value: f64 },
    /// rayon failed to build the worker pool
    ThreadPool(rayon::ThreadPoolBuildError),
    /// Malformed body CSV
    Csv { line: usize, message: String },
}

impl fmt::Display for NbodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbodyError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} bodies")
            }
            NbodyError::LengthMismatch { what, expected, found } => {
                write!(f, "{what}: expected length {expected}, found {found}")
            }
            NbodyError::InvalidMass { index, mass } => {
                write!(f, "body {index} has invalid mass {mass} (must be finite and > 0)")
            }
            NbodyError::InvalidThreadCount(t) => write!(f, "thread count must be at least 1, got {t}"),
            NbodyError::InvalidStepCount(s) => write!(f, "step count must be at least 1, got {s}"),
            NbodyError::InvalidParameter { name, value } => write!(f, "invalid value {value} for {name}"),
            NbodyError::ThreadPool(e) => write!(f, "failed to build thread pool: {e}"),
            NbodyError::Csv { line, message } => write!(f, "csv line {line}: {message}"),
        }
    }
}

impl std::error::Error for NbodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NbodyError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for NbodyError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        NbodyError::ThreadPool(e)
    }
}
