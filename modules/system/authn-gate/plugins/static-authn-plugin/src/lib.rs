#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Gate Plugin
//!
//! This plugin provides static token and session mappings for development and testing.
//!
//! ## Token modes
//!
//! - **`accept_all`** (default): Accepts any non-empty token as `default_subject`.
//! - **`static_tokens`**: Accepts only the listed tokens.
//!
//! ## Sessions
//!
//! The session id is read from the `session_cookie` cookie and looked up in `sessions`.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   kind: static
//!   mode: static_tokens
//!   tokens:
//!     - token: "dev-token"
//!       subject: "u1"
//!   session_cookie: "next-auth.session-token"
//!   sessions:
//!     - session_id: "dev-session"
//!       user_id: "u1"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::StaticAuthNPluginConfig;
pub use module::StaticAuthNPlugin;
