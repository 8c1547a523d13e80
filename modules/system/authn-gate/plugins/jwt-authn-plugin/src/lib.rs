#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! JWT `AuthN` Gate Plugin
//!
//! Verifies HMAC-signed JWTs (HS256/HS384/HS512) with a shared secret.
//!
//! - **Bearer tokens** map `sub`/`exp` to a `VerifiedToken`.
//! - **Session cookies** carry a JWT whose `id` (or `sub`) becomes the
//!   session user. A cookie that fails verification is treated as absent.
//!
//! Expired tokens surface as `TokenExpired`; every other failure as
//! `InvalidToken`.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   kind: jwt
//!   secret: "change-me"
//!   algorithm: HS256
//!   issuer: "https://idp.example"
//!   audience: ["web"]
//!   leeway_secs: 60
//!   session_cookie: "next-auth.session-token"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::{JwtAlgorithm, JwtAuthNPluginConfig};
pub use module::JwtAuthNPlugin;
