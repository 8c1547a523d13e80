//! Static `AuthN` gate plugin.

use std::sync::Arc;

use authn_gate_sdk::{BearerTokenProvider, SessionProvider};
use tracing::info;

use crate::config::{AuthNMode, StaticAuthNPluginConfig};
use crate::domain::Service;

/// Static `AuthN` gate plugin.
///
/// One service backs both providers, so the token and session tables come
/// from the same configuration block.
pub struct StaticAuthNPlugin {
    service: Arc<Service>,
}

impl StaticAuthNPlugin {
    #[must_use]
    pub fn new(cfg: &StaticAuthNPluginConfig) -> Self {
        if cfg.mode == AuthNMode::AcceptAll {
            tracing::warn!(
                "Static AuthN plugin is running in `accept_all` mode: \
                 every bearer token verifies as the default subject. \
                 Do NOT use this mode in production."
            );
        }

        info!(
            mode = ?cfg.mode,
            token_count = cfg.tokens.len(),
            session_count = cfg.sessions.len(),
            session_cookie = %cfg.session_cookie,
            "Static authn plugin initialized"
        );

        Self {
            service: Arc::new(Service::from_config(cfg)),
        }
    }

    #[must_use]
    pub fn token_provider(&self) -> Arc<dyn BearerTokenProvider> {
        self.service.clone()
    }

    #[must_use]
    pub fn session_provider(&self) -> Arc<dyn SessionProvider> {
        self.service.clone()
    }
}
