//! Error types for the evaluation engine.
//!
//! Every variant carries a stable numeric code for machine parsing.
//! An all-zero delta experiment and an empty variant list are not errors:
//! they yield a uniform result and an empty result respectively.

use crate::experiment::ExperimentError;
use ab_config::ValidationError;
use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Evaluation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("input length mismatch for {field}: expected {expected}, got {actual}")]
    InputLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("interval_alpha must be strictly between 0 and 1, got {0}")]
    InvalidIntervalAlpha(f64),

    #[error("sim_count must be at least 1, got {0}")]
    InvalidSimCount(usize),

    #[error("cannot construct {distribution} distribution: {message}")]
    InvalidParameter {
        distribution: &'static str,
        message: String,
    },

    #[error(transparent)]
    Experiment(#[from] ExperimentError),

    #[error(transparent)]
    Config(#[from] ValidationError),
}

impl Error {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            Error::InputLengthMismatch { .. } => 30,
            Error::InvalidIntervalAlpha(_) => 31,
            Error::InvalidSimCount(_) => 32,
            Error::InvalidParameter { .. } => 33,
            Error::Experiment(_) => 34,
            Error::Config(e) => e.code(),
        }
    }

    /// Whether the error stems from caller-supplied input (as opposed to configuration).
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Config(_))
    }

    pub(crate) fn invalid_parameter(distribution: &'static str, err: impl std::fmt::Display) -> Self {
        Error::InvalidParameter {
            distribution,
            message: err.to_string(),
        }
    }
}

/// Check that a per-variant input has the expected length.
pub(crate) fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::InputLengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
