//! JWT `AuthN` gate plugin.

use std::sync::Arc;

use authn_gate_sdk::{BearerTokenProvider, SessionProvider};
use tracing::info;

use crate::config::JwtAuthNPluginConfig;
use crate::domain::{JwtSessionProvider, JwtTokenProvider, JwtVerifier};

/// JWT `AuthN` gate plugin.
///
/// Bearer tokens and session cookies share one verifier.
pub struct JwtAuthNPlugin {
    token_provider: Arc<JwtTokenProvider>,
    session_provider: Arc<JwtSessionProvider>,
}

impl JwtAuthNPlugin {
    #[must_use]
    pub fn new(cfg: &JwtAuthNPluginConfig) -> Self {
        let verifier = Arc::new(JwtVerifier::from_config(cfg));

        info!(
            algorithm = ?cfg.algorithm,
            issuer = cfg.issuer.as_deref().unwrap_or("<any>"),
            audience_count = cfg.audience.len(),
            leeway_secs = cfg.leeway_secs,
            session_cookie = %cfg.session_cookie,
            "JWT authn plugin initialized"
        );

        Self {
            token_provider: Arc::new(JwtTokenProvider::new(verifier.clone())),
            session_provider: Arc::new(JwtSessionProvider::new(
                verifier,
                cfg.session_cookie.clone(),
            )),
        }
    }

    #[must_use]
    pub fn token_provider(&self) -> Arc<dyn BearerTokenProvider> {
        self.token_provider.clone()
    }

    #[must_use]
    pub fn session_provider(&self) -> Arc<dyn SessionProvider> {
        self.session_provider.clone()
    }
}
