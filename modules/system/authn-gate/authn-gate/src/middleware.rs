use std::sync::Arc;

use authn_gate_sdk::{BearerTokenProvider, Identity, RequestDescriptor, SessionProvider};
use axum::Router;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header, request::Parts};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};

use crate::config::AuthnGateConfig;
use crate::error::GateConfigError;
use crate::gate::{AuthnGate, Decision};
use crate::matcher::GateMatcher;

/// Shared state for the gate middleware.
#[derive(Clone)]
pub struct GateState {
    pub gate: AuthnGate,
    pub matcher: Arc<GateMatcher>,
    pub redirect_status: StatusCode,
}

impl GateState {
    /// Build the gate, its matcher and redirect status from configuration.
    ///
    /// # Errors
    /// Returns an error if any part of `cfg` is invalid.
    pub fn from_config(
        cfg: &AuthnGateConfig,
        token_provider: Arc<dyn BearerTokenProvider>,
        session_provider: Arc<dyn SessionProvider>,
    ) -> Result<Self, GateConfigError> {
        let gate = AuthnGate::from_config(cfg, token_provider, session_provider)?;
        let matcher = GateMatcher::new(&cfg.matcher)?;

        tracing::info!(
            public_paths = cfg.public_paths.len(),
            protected_paths = cfg.protected_paths.len(),
            context_prefix = %cfg.context_prefix,
            matcher_patterns = cfg.matcher.len(),
            "AuthN gate built from configuration"
        );

        Ok(Self {
            gate,
            matcher: Arc::new(matcher),
            redirect_status: cfg.redirect_status.status_code(),
        })
    }

    /// Wrap `router` with the gate middleware.
    pub fn layer<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(from_fn_with_state(self, authn_gate_middleware))
    }
}

/// Gate middleware.
///
/// For each request:
/// 1. Skips CORS preflight requests
/// 2. Skips paths outside the gate matcher
/// 3. Evaluates the gate and realizes its decision: redirect, forward with
///    the identity header and `Identity` extension, or forward unchanged
pub async fn authn_gate_middleware(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    if !state.matcher.matches(req.uri().path()) {
        return next.run(req).await;
    }

    let descriptor = RequestDescriptor::from_request(&req);

    match state.gate.evaluate(&descriptor).await {
        Decision::Continue => next.run(req).await,
        Decision::ContinueWithContext { key, value } => {
            // Only the gate may set this header.
            req.headers_mut().remove(&key);
            match HeaderValue::from_str(value.as_str()) {
                Ok(header_value) => {
                    req.headers_mut().insert(key, header_value);
                }
                Err(_) => tracing::warn!(
                    header = %key,
                    "Identity is not a valid header value, forwarding without it"
                ),
            }
            req.extensions_mut().insert(value);
            next.run(req).await
        }
        Decision::RedirectTo { path } => redirect_response(state.redirect_status, &path),
    }
}

fn redirect_response(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::error!(location, "Redirect target is not a valid Location header");
            problem_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Invalid redirect target",
            )
        }
    }
}

/// RFC-9457 Problem Details response.
fn problem_response(status: StatusCode, title: &str, detail: &str) -> Response {
    let body = serde_json::json!({
        "type": "about:blank",
        "title": title,
        "status": status.as_u16(),
        "detail": detail,
    });
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        )],
        body.to_string(),
    )
        .into_response()
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Extractor for the identity the gate forwarded downstream.
///
/// Rejects with 401 when the gate did not attach one.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                problem_response(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    "No authenticated identity on request",
                )
            })
    }
}
