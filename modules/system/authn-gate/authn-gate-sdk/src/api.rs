//! Provider traits consumed by the `AuthN` gate.
//!
//! The gate holds one implementation of each trait and calls both for every
//! request it evaluates. Implementations live in plugin crates.

use async_trait::async_trait;

use crate::error::AuthNGateError;
use crate::models::{RequestDescriptor, Session, VerifiedToken};

/// Verifies an opaque bearer token.
///
/// ```ignore
/// let verified = tokens.verify_token("eyJhbGciOi...").await?;
/// ```
#[async_trait]
pub trait BearerTokenProvider: Send + Sync {
    /// Verify a bearer token.
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - The raw token string (without "Bearer " prefix)
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if the token is malformed or its signature does not verify
    /// - `TokenExpired` if the token is past its expiry
    /// - `Internal` for unexpected errors
    async fn verify_token(&self, bearer_token: &str) -> Result<VerifiedToken, AuthNGateError>;
}

/// Resolves the session associated with a request, typically from a cookie.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Look up the session for `request`.
    ///
    /// Returns `Ok(None)` when the request carries no session.
    ///
    /// # Errors
    ///
    /// - `SessionUnavailable` if the backing store cannot be reached
    /// - `Internal` for unexpected errors
    async fn get_session(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Option<Session>, AuthNGateError>;
}
