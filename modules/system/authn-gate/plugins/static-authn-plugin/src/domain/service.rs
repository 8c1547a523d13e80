//! Service implementation for the static `AuthN` gate plugin.

use std::collections::HashMap;

use authn_gate_sdk::{Session, VerifiedToken};

use crate::config::{AuthNMode, StaticAuthNPluginConfig};

/// Static `AuthN` service.
///
/// Token verification depends on the configured mode:
/// - `accept_all`: Any non-empty token verifies as the default subject
/// - `static_tokens`: Specific tokens verify as specific subjects
///
/// Sessions are looked up by cookie value in a fixed table.
#[derive(Debug)]
pub struct Service {
    mode: AuthNMode,
    default_subject: String,
    token_map: HashMap<String, String>,
    session_cookie: String,
    session_map: HashMap<String, String>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.subject.clone()))
            .collect();
        let session_map = cfg
            .sessions
            .iter()
            .map(|m| (m.session_id.clone(), m.user_id.clone()))
            .collect();

        Self {
            mode: cfg.mode.clone(),
            default_subject: cfg.default_subject.clone(),
            token_map,
            session_cookie: cfg.session_cookie.clone(),
            session_map,
        }
    }

    /// Verify a bearer token.
    ///
    /// Returns `None` if the token is empty or not recognized (in
    /// `static_tokens` mode).
    #[must_use]
    pub fn verify(&self, bearer_token: &str) -> Option<VerifiedToken> {
        if bearer_token.is_empty() {
            return None;
        }

        let subject = match &self.mode {
            AuthNMode::AcceptAll => &self.default_subject,
            AuthNMode::StaticTokens => self.token_map.get(bearer_token)?,
        };

        Some(VerifiedToken {
            subject: Some(subject.clone()),
            expires_at: None,
        })
    }

    /// Look up the session for a session cookie value.
    #[must_use]
    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.session_map.get(session_id).map(Session::for_user)
    }

    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{SessionMapping, TokenMapping};

    fn default_config() -> StaticAuthNPluginConfig {
        StaticAuthNPluginConfig::default()
    }

    #[test]
    fn accept_all_mode_returns_default_subject() {
        let service = Service::from_config(&default_config());

        let verified = service.verify("any-token-value").unwrap();
        assert_eq!(verified.subject.as_deref(), Some("static-user"));
    }

    #[test]
    fn accept_all_mode_rejects_empty_token() {
        let service = Service::from_config(&default_config());

        assert!(service.verify("").is_none());
    }

    #[test]
    fn static_tokens_mode_returns_mapped_subject() {
        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "token-user-a".to_owned(),
                subject: "user-a".to_owned(),
            }],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        let verified = service.verify("token-user-a").unwrap();
        assert_eq!(verified.subject.as_deref(), Some("user-a"));
    }

    #[test]
    fn static_tokens_mode_rejects_unknown_token() {
        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "known-token".to_owned(),
                subject: "user-a".to_owned(),
            }],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        assert!(service.verify("unknown-token").is_none());
    }

    #[test]
    fn sessions_map_cookie_value_to_user() {
        let cfg = StaticAuthNPluginConfig {
            sessions: vec![SessionMapping {
                session_id: "s-123".to_owned(),
                user_id: "u1".to_owned(),
            }],
            ..default_config()
        };

        let service = Service::from_config(&cfg);

        assert_eq!(
            service.session("s-123").and_then(|s| s.user_id),
            Some("u1".to_owned())
        );
        assert!(service.session("s-999").is_none());
    }
}
