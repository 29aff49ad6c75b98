//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `EnvError` variants and CLI-level failures to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - `exec` passes the child's own exit code through unchanged.

use envfile::EnvError;
use thiserror::Error;

/// Structured exit codes for envfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Not found - env file or requested key does not exist.
    NotFound = 4,

    /// Validation error - malformed line, key or value.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,

    /// Recursion detected - variables reference each other in a cycle.
    RecursionDetected = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&EnvError> for ExitCode {
    fn from(err: &EnvError) -> Self {
        match err.root() {
            EnvError::SourceNotFound { .. } => ExitCode::NotFound,
            EnvError::RecursionDetected { .. } => ExitCode::RecursionDetected,
            e if e.is_validation() => ExitCode::ValidationError,
            _ => ExitCode::GeneralError,
        }
    }
}

/// A key requested on the command line is not defined by the env files.
#[derive(Debug, Error)]
#[error("Variable '{0}' is not defined in the env files")]
pub struct KeyNotFound(pub String);

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is found in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(env_err) = cause.downcast_ref::<EnvError>() {
                return ExitCode::from(env_err);
            }
            if cause.downcast_ref::<KeyNotFound>().is_some() {
                return ExitCode::NotFound;
            }
        }

        ExitCode::GeneralError
    }
}
