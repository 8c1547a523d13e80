//! Provider implementations for the static `AuthN` gate plugin.
//!
//! Implements the SDK provider traits using the domain service.

use async_trait::async_trait;
use authn_gate_sdk::{
    AuthNGateError, BearerTokenProvider, RequestDescriptor, Session, SessionProvider,
    VerifiedToken,
};

use super::service::Service;

#[async_trait]
impl BearerTokenProvider for Service {
    async fn verify_token(&self, bearer_token: &str) -> Result<VerifiedToken, AuthNGateError> {
        self.verify(bearer_token)
            .ok_or_else(|| AuthNGateError::InvalidToken("unknown token".to_owned()))
    }
}

#[async_trait]
impl SessionProvider for Service {
    async fn get_session(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Option<Session>, AuthNGateError> {
        Ok(request
            .cookie(self.session_cookie())
            .and_then(|session_id| self.session(session_id)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use http::{HeaderMap, HeaderValue, header::COOKIE};

    use super::*;
    use crate::config::{SessionMapping, StaticAuthNPluginConfig};

    #[tokio::test]
    async fn token_provider_accept_all_succeeds() {
        let service = Service::from_config(&StaticAuthNPluginConfig::default());
        let provider: &dyn BearerTokenProvider = &service;

        let result = provider.verify_token("any-token").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn token_provider_empty_token_is_invalid() {
        let service = Service::from_config(&StaticAuthNPluginConfig::default());
        let provider: &dyn BearerTokenProvider = &service;

        let result = provider.verify_token("").await;
        match result.unwrap_err() {
            AuthNGateError::InvalidToken(_) => {}
            other => panic!("Expected InvalidToken, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_provider_reads_configured_cookie() {
        let cfg = StaticAuthNPluginConfig {
            sessions: vec![SessionMapping {
                session_id: "s-1".to_owned(),
                user_id: "u1".to_owned(),
            }],
            ..StaticAuthNPluginConfig::default()
        };
        let service = Service::from_config(&cfg);
        let provider: &dyn SessionProvider = &service;

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; next-auth.session-token=s-1"),
        );
        let request = RequestDescriptor::new("/me", headers);

        let session = provider.get_session(&request).await.unwrap();
        assert_eq!(session.and_then(|s| s.user_id), Some("u1".to_owned()));
    }

    #[tokio::test]
    async fn session_provider_without_cookie_is_none() {
        let service = Service::from_config(&StaticAuthNPluginConfig::default());
        let provider: &dyn SessionProvider = &service;

        let request = RequestDescriptor::new("/me", HeaderMap::new());
        assert!(provider.get_session(&request).await.unwrap().is_none());
    }
}
