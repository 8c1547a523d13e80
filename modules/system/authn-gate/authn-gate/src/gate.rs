use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use authn_gate_sdk::{
    AuthNGateError, BearerTokenProvider, Identity, RequestDescriptor, Session, SessionProvider,
    VerifiedToken,
};
use http::{HeaderName, HeaderValue};
use tracing::{debug, info, warn};

use crate::config::AuthnGateConfig;
use crate::error::GateConfigError;
use crate::policy::{PathClass, PolicyTable};

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request unmodified.
    Continue,
    /// Forward the request with header `key` set to the identity.
    ContinueWithContext { key: HeaderName, value: Identity },
    /// Redirect the caller to `path`.
    RedirectTo { path: String },
}

/// Authentication state resolved from the token and session providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVerdict {
    Anonymous,
    Authenticated(Identity),
}

impl AuthVerdict {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }
}

/// Per-request authorization gate.
///
/// Holds both providers and the policy table. Cheap to clone; every clone
/// shares the same providers.
#[derive(Clone)]
pub struct AuthnGate {
    token_provider: Arc<dyn BearerTokenProvider>,
    session_provider: Arc<dyn SessionProvider>,
    policy: Arc<PolicyTable>,
    context_header: HeaderName,
    authenticated_redirect: String,
    unauthenticated_redirect: String,
    provider_timeout: Option<Duration>,
}

impl AuthnGate {
    /// Create a gate with the default header name, redirect targets and no
    /// provider timeout.
    #[must_use]
    pub fn new(
        token_provider: Arc<dyn BearerTokenProvider>,
        session_provider: Arc<dyn SessionProvider>,
        policy: PolicyTable,
    ) -> Self {
        let defaults = AuthnGateConfig::default();
        Self {
            token_provider,
            session_provider,
            policy: Arc::new(policy),
            context_header: HeaderName::from_static("x-user-id"),
            authenticated_redirect: defaults.authenticated_redirect,
            unauthenticated_redirect: defaults.unauthenticated_redirect,
            provider_timeout: None,
        }
    }

    /// Create a gate from configuration.
    ///
    /// # Errors
    /// Returns an error if the policy table, header name or a redirect target
    /// in `cfg` is invalid.
    pub fn from_config(
        cfg: &AuthnGateConfig,
        token_provider: Arc<dyn BearerTokenProvider>,
        session_provider: Arc<dyn SessionProvider>,
    ) -> Result<Self, GateConfigError> {
        let policy = PolicyTable::from_config(cfg)?;
        let context_header = HeaderName::from_bytes(cfg.context_header.as_bytes())
            .map_err(|_| GateConfigError::InvalidHeaderName(cfg.context_header.clone()))?;
        validate_redirect(&cfg.authenticated_redirect)?;
        validate_redirect(&cfg.unauthenticated_redirect)?;
        if cfg.provider_timeout.is_some_and(|d| d.is_zero()) {
            return Err(GateConfigError::InvalidTimeout);
        }

        Ok(Self {
            token_provider,
            session_provider,
            policy: Arc::new(policy),
            context_header,
            authenticated_redirect: cfg.authenticated_redirect.clone(),
            unauthenticated_redirect: cfg.unauthenticated_redirect.clone(),
            provider_timeout: cfg.provider_timeout,
        })
    }

    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Header carrying the identity under the context prefix.
    #[must_use]
    pub fn context_header(&self) -> &HeaderName {
        &self.context_header
    }

    /// Evaluate `request` and decide whether it continues, continues with the
    /// identity attached, or is redirected.
    pub async fn evaluate(&self, request: &RequestDescriptor) -> Decision {
        let verdict = self.resolve(request).await;
        self.decide(request.path(), &verdict)
    }

    /// Resolve the caller's authentication state.
    ///
    /// Both providers are queried concurrently. A verified token only
    /// authenticates when the session also carries an identity, and the
    /// identity always comes from the session. Provider failures are logged
    /// and never propagated.
    pub async fn resolve(&self, request: &RequestDescriptor) -> AuthVerdict {
        let (token_result, session) = tokio::join!(
            self.verify_token(request.bearer_token()),
            self.lookup_session(request),
        );
        let session_identity = session.as_ref().and_then(Session::identity);
        let mut verdict = AuthVerdict::Anonymous;

        match token_result {
            Some(Ok(verified)) => match &session_identity {
                Some(identity) => verdict = AuthVerdict::Authenticated(identity.clone()),
                None => warn!(
                    token_subject = verified.subject.as_deref().unwrap_or(""),
                    "Bearer token verified but no session identity is available"
                ),
            },
            Some(Err(err)) => log_token_error(&err),
            None => {}
        }

        // The session overrides whatever the token path resolved.
        if let Some(identity) = session_identity {
            verdict = AuthVerdict::Authenticated(identity);
        }

        verdict
    }

    /// Apply the routing policy to an already resolved verdict.
    #[must_use]
    pub fn decide(&self, path: &str, verdict: &AuthVerdict) -> Decision {
        match (verdict, self.policy.classify(path)) {
            (AuthVerdict::Authenticated(identity), PathClass::Public) => {
                info!(
                    user_id = %identity,
                    path,
                    "Authenticated user tried to access {path}, redirecting to {}",
                    self.authenticated_redirect
                );
                Decision::RedirectTo {
                    path: self.authenticated_redirect.clone(),
                }
            }
            (AuthVerdict::Anonymous, PathClass::Protected) => {
                info!(
                    path,
                    "Unauthenticated user tried to access {path}, redirecting to {}",
                    self.unauthenticated_redirect
                );
                Decision::RedirectTo {
                    path: self.unauthenticated_redirect.clone(),
                }
            }
            (AuthVerdict::Authenticated(identity), _) if self.policy.requires_context(path) => {
                debug!(user_id = %identity, path, "Forwarding identity downstream");
                Decision::ContinueWithContext {
                    key: self.context_header.clone(),
                    value: identity.clone(),
                }
            }
            _ => {
                debug!(path, authenticated = verdict.is_authenticated(), "Continuing");
                Decision::Continue
            }
        }
    }

    async fn verify_token(
        &self,
        token: Option<&str>,
    ) -> Option<Result<VerifiedToken, AuthNGateError>> {
        let token = token?;
        Some(self.bounded(self.token_provider.verify_token(token)).await)
    }

    async fn lookup_session(&self, request: &RequestDescriptor) -> Option<Session> {
        match self.bounded(self.session_provider.get_session(request)).await {
            Ok(session) => session,
            Err(err) => {
                log_session_error(&err);
                None
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AuthNGateError>>,
    ) -> Result<T, AuthNGateError> {
        match self.provider_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(AuthNGateError::Timeout(limit))),
            None => call.await,
        }
    }
}

fn validate_redirect(target: &str) -> Result<(), GateConfigError> {
    if target.starts_with('/') && HeaderValue::from_str(target).is_ok() {
        Ok(())
    } else {
        Err(GateConfigError::InvalidRedirect(target.to_owned()))
    }
}

#[allow(clippy::cognitive_complexity)]
fn log_token_error(err: &AuthNGateError) {
    match err {
        AuthNGateError::InvalidToken(msg) => warn!("Error verifying bearer token: {msg}"),
        AuthNGateError::TokenExpired => warn!("Error verifying bearer token: token expired"),
        AuthNGateError::Timeout(_) => warn!("Error verifying bearer token: {err}"),
        AuthNGateError::SessionUnavailable(_) | AuthNGateError::Internal(_) => {
            tracing::error!("Token provider failed: {err}");
        }
    }
}

fn log_session_error(err: &AuthNGateError) {
    match err {
        AuthNGateError::SessionUnavailable(msg) => {
            debug!("Session unavailable, treating as no session: {msg}");
        }
        other => warn!("Session lookup failed, treating as no session: {other}"),
    }
}
