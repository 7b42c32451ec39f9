//! Exit codes for the `abtest` CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (fix the experiment file, settings or flags)
//! - 20-29: Internal errors

use crate::error::Error;
use crate::experiment::ExperimentError;

/// Exit codes for `abtest` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report written.
    Clean = 0,

    /// Invalid command-line arguments.
    ArgsError = 10,

    /// Experiment file or variant data rejected.
    InputError = 11,

    /// Settings file, environment override or settings flag rejected.
    ConfigError = 12,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// Reading input or writing output failed.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// User/input errors (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Name for JSON error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Experiment(ExperimentError::Io(_)) => ExitCode::IoError,
            Error::Config(_) => ExitCode::ConfigError,
            Error::InvalidParameter { .. } => ExitCode::InternalError,
            Error::InputLengthMismatch { .. }
            | Error::InvalidIntervalAlpha(_)
            | Error::InvalidSimCount(_)
            | Error::Experiment(_) => ExitCode::InputError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
