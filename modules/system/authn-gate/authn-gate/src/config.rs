use std::time::Duration;

use http::StatusCode;
use serde::{Deserialize, Serialize};

fn default_public_paths() -> Vec<String> {
    vec!["/auth/register".to_owned(), "/auth/signin".to_owned()]
}

fn default_protected_paths() -> Vec<String> {
    vec!["/me".to_owned()]
}

fn default_context_prefix() -> String {
    "/api/me".to_owned()
}

fn default_context_header() -> String {
    "x-user-id".to_owned()
}

fn default_authenticated_redirect() -> String {
    "/me".to_owned()
}

fn default_unauthenticated_redirect() -> String {
    "/auth/register".to_owned()
}

fn default_matcher() -> Vec<String> {
    vec![
        "/auth/register".to_owned(),
        "/auth/signin".to_owned(),
        "/me".to_owned(),
        "/api/me/:path*".to_owned(),
    ]
}

#[allow(clippy::unnecessary_wraps)]
fn default_provider_timeout() -> Option<Duration> {
    Some(Duration::from_secs(5))
}

/// `AuthN` gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthnGateConfig {
    /// Exact paths only anonymous callers may visit.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Exact paths only authenticated callers may visit.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,

    /// Authenticated requests whose path starts with this prefix get the
    /// identity forwarded in `context_header`.
    #[serde(default = "default_context_prefix")]
    pub context_prefix: String,

    #[serde(default = "default_context_header")]
    pub context_header: String,

    /// Where authenticated callers are sent when they hit a public path.
    #[serde(default = "default_authenticated_redirect")]
    pub authenticated_redirect: String,

    /// Where anonymous callers are sent when they hit a protected path.
    #[serde(default = "default_unauthenticated_redirect")]
    pub unauthenticated_redirect: String,

    /// Path patterns the gate applies to. Everything else passes through.
    ///
    /// Supports `:name` for one segment and a trailing `:name*` for zero or more.
    #[serde(default = "default_matcher")]
    pub matcher: Vec<String>,

    #[serde(default)]
    pub redirect_status: RedirectStatus,

    /// Upper bound for each provider call, e.g. `"500ms"`. `null` disables it.
    #[serde(default = "default_provider_timeout", with = "humantime_opt")]
    pub provider_timeout: Option<Duration>,
}

impl Default for AuthnGateConfig {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
            protected_paths: default_protected_paths(),
            context_prefix: default_context_prefix(),
            context_header: default_context_header(),
            authenticated_redirect: default_authenticated_redirect(),
            unauthenticated_redirect: default_unauthenticated_redirect(),
            matcher: default_matcher(),
            redirect_status: RedirectStatus::default(),
            provider_timeout: default_provider_timeout(),
        }
    }
}

/// HTTP status used for gate redirects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectStatus {
    /// 307 Temporary Redirect
    #[default]
    Temporary,
    /// 303 See Other
    SeeOther,
    /// 308 Permanent Redirect
    Permanent,
}

impl RedirectStatus {
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Temporary => StatusCode::TEMPORARY_REDIRECT,
            Self::SeeOther => StatusCode::SEE_OTHER,
            Self::Permanent => StatusCode::PERMANENT_REDIRECT,
        }
    }
}

mod humantime_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| humantime::parse_duration(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg: AuthnGateConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.public_paths, ["/auth/register", "/auth/signin"]);
        assert_eq!(cfg.protected_paths, ["/me"]);
        assert_eq!(cfg.context_prefix, "/api/me");
        assert_eq!(cfg.context_header, "x-user-id");
        assert_eq!(cfg.redirect_status, RedirectStatus::Temporary);
        assert_eq!(cfg.provider_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.matcher.len(), 4);
    }

    #[test]
    fn provider_timeout_parses_humantime() {
        let cfg: AuthnGateConfig =
            serde_json::from_str(r#"{ "provider_timeout": "250ms" }"#).unwrap();
        assert_eq!(cfg.provider_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn provider_timeout_null_disables() {
        let cfg: AuthnGateConfig =
            serde_json::from_str(r#"{ "provider_timeout": null }"#).unwrap();
        assert_eq!(cfg.provider_timeout, None);
    }

    #[test]
    fn provider_timeout_rejects_garbage() {
        let res = serde_json::from_str::<AuthnGateConfig>(r#"{ "provider_timeout": "soon" }"#);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let res = serde_json::from_str::<AuthnGateConfig>(r#"{ "public_path": [] }"#);
        assert!(res.is_err());
    }

    #[test]
    fn redirect_status_codes() {
        let cfg: AuthnGateConfig =
            serde_json::from_str(r#"{ "redirect_status": "see_other" }"#).unwrap();
        assert_eq!(cfg.redirect_status.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(
            RedirectStatus::Permanent.status_code(),
            StatusCode::PERMANENT_REDIRECT
        );
    }

    #[test]
    fn serialized_timeout_round_trips_through_humantime() {
        let value = serde_json::to_value(AuthnGateConfig::default()).unwrap();
        assert_eq!(value["provider_timeout"], "5s");
    }
}
