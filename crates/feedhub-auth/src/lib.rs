//! # feedhub-auth
//!
//! Verification of bearer JWTs issued by the hosted auth provider. Tokens
//! are HS256-signed with a shared secret; this crate never manages users or
//! sessions. [`JwtEncoder`] mints compatible tokens for the CLI and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
