//! Errors raised while building the gate from configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateConfigError {
    /// A path is both public and protected.
    #[error("path '{0}' is listed as both public and protected")]
    OverlappingPath(String),

    #[error("invalid matcher pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid context header name '{0}'")]
    InvalidHeaderName(String),

    #[error("provider timeout must be greater than zero")]
    InvalidTimeout,

    /// Redirect targets must be absolute paths usable as a `Location` value.
    #[error("invalid redirect target '{0}'")]
    InvalidRedirect(String),
}
