/*!
 * Error Types
 * Centralized error handling with thiserror and serde support
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of an admission request
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Errors raised at the admission boundary
///
/// The scheduling core assumes positive durations; invalid requests are
/// rejected here and never reach a queue level.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AdmissionError {
    #[error("invalid duration {0}: a process needs at least one quantum")]
    InvalidDuration(u32),

    #[error("admissions are sealed, no new processes accepted")]
    Sealed,
}

/// Errors from the shell command parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: {reason}")]
    BadArguments { command: String, reason: String },
}

impl CommandError {
    pub fn bad_arguments(command: &str, reason: impl Into<String>) -> Self {
        Self::BadArguments {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}
