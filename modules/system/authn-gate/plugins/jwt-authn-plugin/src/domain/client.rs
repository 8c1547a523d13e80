//! Provider implementations for the JWT `AuthN` gate plugin.

use std::sync::Arc;

use async_trait::async_trait;
use authn_gate_sdk::{
    AuthNGateError, BearerTokenProvider, RequestDescriptor, Session, SessionProvider,
    VerifiedToken,
};
use tracing::debug;

use super::verifier::JwtVerifier;

/// Verifies `Authorization: Bearer` JWTs.
pub struct JwtTokenProvider {
    verifier: Arc<JwtVerifier>,
}

impl JwtTokenProvider {
    #[must_use]
    pub fn new(verifier: Arc<JwtVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl BearerTokenProvider for JwtTokenProvider {
    async fn verify_token(&self, bearer_token: &str) -> Result<VerifiedToken, AuthNGateError> {
        let claims = self.verifier.verify(bearer_token)?;
        Ok(VerifiedToken {
            subject: claims.sub,
            expires_at: claims.exp,
        })
    }
}

/// Reads a JWT session cookie.
///
/// A missing or unverifiable cookie means "no session", never an error.
pub struct JwtSessionProvider {
    verifier: Arc<JwtVerifier>,
    cookie_name: String,
}

impl JwtSessionProvider {
    #[must_use]
    pub fn new(verifier: Arc<JwtVerifier>, cookie_name: impl Into<String>) -> Self {
        Self {
            verifier,
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Option<Session>, AuthNGateError> {
        let Some(raw) = request.cookie(&self.cookie_name) else {
            return Ok(None);
        };

        match self.verifier.verify(raw) {
            Ok(claims) => Ok(Some(Session {
                user_id: claims.user_id.or(claims.sub),
                access_token: claims.access_token,
            })),
            Err(e) => {
                debug!(cookie = %self.cookie_name, error = %e, "Ignoring unverifiable session cookie");
                Ok(None)
            }
        }
    }
}
