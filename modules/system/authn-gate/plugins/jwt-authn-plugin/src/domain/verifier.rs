//! HMAC JWT verification.

use authn_gate_sdk::AuthNGateError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::JwtAuthNPluginConfig;

/// Claims the gate reads from a token. Unknown claims are ignored.
#[derive(Debug, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub exp: Option<u64>,

    /// Explicit user id, as session JWTs carry it.
    #[serde(default, alias = "id", alias = "userId")]
    pub user_id: Option<String>,

    /// Upstream access token embedded in a session JWT.
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<SecretString>,
}

/// Verifies tokens against one key and one set of validation rules.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn from_config(cfg: &JwtAuthNPluginConfig) -> Self {
        let mut validation = Validation::new(cfg.algorithm.into());
        validation.leeway = cfg.leeway_secs;

        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }
        if cfg.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&cfg.audience);
        }

        Self {
            key: DecodingKey::from_secret(cfg.secret.expose_secret().as_bytes()),
            validation,
        }
    }

    /// Verify signature and registered claims, returning the payload.
    ///
    /// # Errors
    ///
    /// `TokenExpired` when `exp` is past the leeway, `InvalidToken` for any
    /// other failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthNGateError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthNGateError::TokenExpired,
                _ => AuthNGateError::InvalidToken(e.to_string()),
            })
    }
}
