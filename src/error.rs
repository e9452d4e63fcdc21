//! Error types for swarmctl.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for swarmctl operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum SwarmError {
    /// User provided invalid arguments or input.
    #[error("{0}")]
    UserError(String),

    /// An agent or task identifier does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Config, scan profile, or script manifest failed validation.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A scenario run completed with failed tasks.
    #[error("{0}")]
    TaskFailed(String),

    /// Reading or writing a file (or stdio) failed.
    #[error("I/O failure: {0}")]
    Io(String),
}

impl SwarmError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SwarmError::UserError(_) => exit_codes::USER_ERROR,
            SwarmError::NotFound(_) => exit_codes::USER_ERROR,
            SwarmError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            SwarmError::TaskFailed(_) => exit_codes::TASK_FAILURE,
            SwarmError::Io(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for swarmctl operations.
pub type Result<T> = std::result::Result<T, SwarmError>;
