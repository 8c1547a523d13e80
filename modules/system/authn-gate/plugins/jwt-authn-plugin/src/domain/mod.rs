pub mod client;
pub mod verifier;

pub use client::{JwtSessionProvider, JwtTokenProvider};
pub use verifier::JwtVerifier;
