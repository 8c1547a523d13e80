//! Configuration for the JWT `AuthN` gate plugin.

use jsonwebtoken::Algorithm;
use secrecy::SecretString;
use serde::Deserialize;

fn default_leeway_secs() -> u64 {
    60
}

fn default_session_cookie() -> String {
    "next-auth.session-token".to_owned()
}

/// Plugin configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtAuthNPluginConfig {
    /// Shared HMAC secret for bearer tokens and session cookies.
    pub secret: SecretString,

    #[serde(default)]
    pub algorithm: JwtAlgorithm,

    /// Required `iss` claim, if set.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Accepted `aud` values. Empty disables the audience check.
    #[serde(default)]
    pub audience: Vec<String>,

    /// Clock skew tolerated on `exp`/`nbf`, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,

    /// Name of the cookie carrying the session JWT.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl JwtAuthNPluginConfig {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            algorithm: JwtAlgorithm::default(),
            issuer: None,
            audience: Vec::new(),
            leeway_secs: default_leeway_secs(),
            session_cookie: default_session_cookie(),
        }
    }
}

/// HMAC signing algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum JwtAlgorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "HS384")]
    Hs384,
    #[serde(rename = "HS512")]
    Hs512,
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(value: JwtAlgorithm) -> Self {
        match value {
            JwtAlgorithm::Hs256 => Self::HS256,
            JwtAlgorithm::Hs384 => Self::HS384,
            JwtAlgorithm::Hs512 => Self::HS512,
        }
    }
}
