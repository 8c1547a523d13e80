//! Domain models for the `AuthN` gate.

use std::fmt;

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use secrecy::SecretString;

/// The parts of an incoming request the gate and its providers look at.
///
/// Header lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    path: String,
    headers: HeaderMap,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(path: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            path: path.into(),
            headers,
        }
    }

    /// Capture path and headers from an HTTP request.
    #[must_use]
    pub fn from_request<B>(req: &http::Request<B>) -> Self {
        Self::new(req.uri().path(), req.headers().clone())
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Bearer token from the `Authorization` header, without the `Bearer ` prefix.
    ///
    /// Returns `None` when the header is missing, not valid UTF-8, uses another
    /// scheme, or carries an empty token.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
            .filter(|token| !token.is_empty())
    }

    /// Value of the cookie `name`, searching every `Cookie` header.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|line| line.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Resolved user identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Returns `None` for an empty identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful token verification.
///
/// Carries the token's own claims. The gate does not derive the
/// authenticated identity from `subject`; it takes it from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedToken {
    /// `sub` claim, if the token has one.
    pub subject: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: Option<u64>,
}

/// Session resolved by a [`SessionProvider`](crate::SessionProvider).
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// User id stored in the session.
    pub user_id: Option<String>,
    /// Access token stored alongside the session. Redacted in `Debug`.
    pub access_token: Option<SecretString>,
}

impl Session {
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            access_token: None,
        }
    }

    /// The session's identity, if it has a non-empty user id.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.user_id.as_deref().and_then(Identity::new)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn with_header(name: http::header::HeaderName, value: &'static str) -> RequestDescriptor {
        let mut headers = HeaderMap::new();
        headers.append(name, HeaderValue::from_static(value));
        RequestDescriptor::new("/me", headers)
    }

    #[test]
    fn bearer_token_strips_prefix() {
        let req = with_header(AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(req.bearer_token(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_ignores_other_schemes() {
        let req = with_header(AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(req.bearer_token(), None);
    }

    #[test]
    fn bearer_token_empty_is_none() {
        let req = with_header(AUTHORIZATION, "Bearer   ");
        assert_eq!(req.bearer_token(), None);
    }

    #[test]
    fn bearer_token_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer t1"),
        );
        let req = RequestDescriptor::new("/me", headers);
        assert_eq!(req.bearer_token(), Some("t1"));
    }

    #[test]
    fn cookie_found_among_several() {
        let req = with_header(COOKIE, "theme=dark; next-auth.session-token=s1; lang=en");
        assert_eq!(req.cookie("next-auth.session-token"), Some("s1"));
        assert_eq!(req.cookie("lang"), Some("en"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn cookie_searches_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));
        let req = RequestDescriptor::new("/", headers);
        assert_eq!(req.cookie("b"), Some("2"));
    }

    #[test]
    fn identity_rejects_empty() {
        assert!(Identity::new("").is_none());
        assert_eq!(Identity::new("u1").unwrap().to_string(), "u1");
    }

    #[test]
    fn session_identity_requires_non_empty_user_id() {
        assert!(Session::default().identity().is_none());
        assert!(Session::for_user("").identity().is_none());
        assert_eq!(
            Session::for_user("u1").identity().as_ref().map(Identity::as_str),
            Some("u1")
        );
    }

    #[test]
    fn session_debug_redacts_access_token() {
        let session = Session {
            user_id: Some("u1".to_owned()),
            access_token: Some(SecretString::from("super-secret".to_owned())),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
