#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthN` Gate
//!
//! Decides per request whether the caller is authenticated and whether the
//! requested path is allowed for that state.
//!
//! ## Request flow
//!
//! 1. The [`GateMatcher`] filters which paths the gate applies to
//! 2. [`AuthnGate::resolve`] queries the bearer token and session providers
//! 3. [`AuthnGate::decide`] applies the [`PolicyTable`] and yields a [`Decision`]
//! 4. [`authn_gate_middleware`] realizes the decision in axum
//!
//! ## Configuration
//!
//! ```yaml
//! gate:
//!   public_paths: ["/auth/register", "/auth/signin"]
//!   protected_paths: ["/me"]
//!   context_prefix: "/api/me"
//!   context_header: "x-user-id"
//!   authenticated_redirect: "/me"
//!   unauthenticated_redirect: "/auth/register"
//!   matcher: ["/auth/register", "/auth/signin", "/me", "/api/me/:path*"]
//!   redirect_status: temporary
//!   provider_timeout: 5s
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod middleware;
pub mod policy;

pub use config::{AuthnGateConfig, RedirectStatus};
pub use error::GateConfigError;
pub use gate::{AuthVerdict, AuthnGate, Decision};
pub use matcher::GateMatcher;
pub use middleware::{AuthenticatedUser, GateState, authn_gate_middleware};
pub use policy::{PathClass, PolicyTable};
