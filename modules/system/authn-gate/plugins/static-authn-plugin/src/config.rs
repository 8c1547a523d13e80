//! Configuration for the static `AuthN` gate plugin.

use serde::{Deserialize, Serialize};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNPluginConfig {
    /// Token verification mode.
    pub mode: AuthNMode,

    /// Subject reported for every token in `accept_all` mode.
    pub default_subject: String,

    /// Static token-to-subject mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,

    /// Name of the cookie carrying the session id.
    pub session_cookie: String,

    /// Static session-id-to-user mappings.
    pub sessions: Vec<SessionMapping>,
}

impl Default for StaticAuthNPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::AcceptAll,
            default_subject: "static-user".to_owned(),
            tokens: Vec::new(),
            session_cookie: "next-auth.session-token".to_owned(),
            sessions: Vec::new(),
        }
    }
}

/// Token verification mode.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token.
    #[default]
    AcceptAll,
    /// Accept only the configured tokens.
    StaticTokens,
}

/// Maps a static token to the subject it verifies as.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    pub token: String,
    pub subject: String,
}

/// Maps a session cookie value to a user id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionMapping {
    pub session_id: String,
    pub user_id: String,
}
