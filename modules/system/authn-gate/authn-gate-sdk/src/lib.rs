#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthN` Gate SDK
//!
//! This crate provides the public API shared by the `authn_gate` module and
//! the provider plugins that back it:
//!
//! - [`BearerTokenProvider`] - Verifies bearer tokens from the `Authorization` header
//! - [`SessionProvider`] - Looks up the session attached to a request
//! - [`RequestDescriptor`], [`Identity`], [`Session`], [`VerifiedToken`] - Models
//! - [`AuthNGateError`] - Error types
//!
//! ## Usage
//!
//! Plugins implement the provider traits; the gate consumes them as trait objects:
//!
//! ```ignore
//! use authn_gate_sdk::{BearerTokenProvider, SessionProvider};
//!
//! let tokens: Arc<dyn BearerTokenProvider> = Arc::new(plugin.token_provider());
//! let sessions: Arc<dyn SessionProvider> = Arc::new(plugin.session_provider());
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::{BearerTokenProvider, SessionProvider};
pub use error::AuthNGateError;
pub use models::{Identity, RequestDescriptor, Session, VerifiedToken};
