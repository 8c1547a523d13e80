//! Provider wiring and the demo router served behind the gate.

use std::sync::Arc;

use anyhow::Context;
use authn_gate::{AuthenticatedUser, GateState};
use authn_gate_sdk::{BearerTokenProvider, Identity, SessionProvider};
use axum::extract::Path;
use axum::http::{HeaderMap, HeaderName, Request};
use axum::routing::get;
use axum::{Json, Router};
use jwt_authn_plugin::JwtAuthNPlugin;
use serde_json::{Value, json};
use static_authn_plugin::StaticAuthNPlugin;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::{ProvidersConfig, ServerConfig};

/// Build both providers from the selected plugin.
pub fn build_providers(
    cfg: &ProvidersConfig,
) -> (Arc<dyn BearerTokenProvider>, Arc<dyn SessionProvider>) {
    match cfg {
        ProvidersConfig::Static(cfg) => {
            let plugin = StaticAuthNPlugin::new(cfg);
            (plugin.token_provider(), plugin.session_provider())
        }
        ProvidersConfig::Jwt(cfg) => {
            let plugin = JwtAuthNPlugin::new(cfg);
            (plugin.token_provider(), plugin.session_provider())
        }
    }
}

/// Build the gate state from the full server configuration.
///
/// # Errors
/// Returns an error if the gate section is invalid.
pub fn build_gate(cfg: &ServerConfig) -> anyhow::Result<GateState> {
    let (token_provider, session_provider) = build_providers(&cfg.providers);
    GateState::from_config(&cfg.gate, token_provider, session_provider)
        .context("invalid gate configuration")
}

/// Demo downstream routes wrapped by the gate, tracing and request ids.
pub fn build_router(state: GateState) -> Router {
    let context_header = state.gate.context_header().clone();

    let routes = Router::new()
        .route("/auth/register", get(|| async { page("register") }))
        .route("/auth/signin", get(|| async { page("signin") }))
        .route("/me", get(|| async { page("me") }))
        .route(
            "/api/me/{*rest}",
            get(
                move |Path(rest): Path<String>,
                      AuthenticatedUser(identity): AuthenticatedUser,
                      headers: HeaderMap| {
                    let context_header = context_header.clone();
                    async move { echo_identity(&context_header, &rest, &identity, &headers) }
                },
            ),
        )
        .route("/healthz", get(|| async { "ok" }));

    let router = state.layer(routes);

    let x_request_id = HeaderName::from_static("x-request-id");
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<axum::body::Body>| {
                    let rid = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                ),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

fn page(name: &'static str) -> Json<Value> {
    Json(json!({ "page": name }))
}

fn echo_identity(
    context_header: &HeaderName,
    rest: &str,
    identity: &Identity,
    headers: &HeaderMap,
) -> Json<Value> {
    let forwarded = headers
        .get(context_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    Json(json!({
        "path": rest,
        "identity": identity.as_str(),
        "forwarded": forwarded,
    }))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{StatusCode, header};
    use axum::response::Response;
    use figment::Figment;
    use figment::providers::{Format, Yaml};
    use tower::ServiceExt;

    use super::*;

    const CONFIG: &str = r#"
providers:
  kind: static
  mode: static_tokens
  tokens:
    - token: "dev-token"
      subject: "u1"
  sessions:
    - session_id: "dev-session"
      user_id: "u1"
"#;

    fn router() -> Router {
        let cfg = ServerConfig::from_figment(&Figment::new().merge(Yaml::string(CONFIG))).unwrap();
        build_router(build_gate(&cfg).unwrap())
    }

    async fn send(path: &str, session: bool) -> Response {
        let mut req = Request::builder().uri(path);
        if session {
            req = req
                .header(header::AUTHORIZATION, "Bearer dev-token")
                .header(header::COOKIE, "next-auth.session-token=dev-session");
        }
        router().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn anonymous_me_redirects_to_register() {
        let res = send("/me", false).await;

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/auth/register");
    }

    #[tokio::test]
    async fn signed_in_register_redirects_to_me() {
        let res = send("/auth/register", true).await;

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/me");
    }

    #[tokio::test]
    async fn api_me_echoes_forwarded_identity() {
        let res = send("/api/me/profile", true).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        assert_eq!(body["path"], "profile");
        assert_eq!(body["identity"], "u1");
        assert_eq!(body["forwarded"], "u1");
    }

    #[tokio::test]
    async fn anonymous_api_me_is_unauthorized() {
        let res = send("/api/me/profile", false).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn healthz_bypasses_gate_and_gets_request_id() {
        let res = send("/healthz", false).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[test]
    fn invalid_gate_config_is_reported() {
        let cfg = ServerConfig::from_figment(&Figment::new().merge(Yaml::string(
            "gate:\n  public_paths: [\"/me\"]\n  protected_paths: [\"/me\"]\n",
        )))
        .unwrap();

        let err = build_gate(&cfg).err().unwrap();
        assert!(err.to_string().contains("invalid gate configuration"));
    }
}
