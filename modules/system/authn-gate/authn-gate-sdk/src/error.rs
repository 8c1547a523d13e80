//! Error types for `AuthN` gate providers.

use std::time::Duration;

use thiserror::Error;

/// Errors a token or session provider can report.
///
/// The gate never surfaces these to the client; they are logged and the
/// request is treated as unauthenticated via the failing provider.
#[derive(Debug, Error)]
pub enum AuthNGateError {
    /// The token is malformed or its signature does not verify.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token is well-formed but expired.
    #[error("token expired")]
    TokenExpired,

    /// The session backend could not be reached.
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    /// The provider did not answer within the configured timeout.
    #[error("provider timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_reports_millis() {
        let err = AuthNGateError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "provider timed out after 250ms");
    }
}
