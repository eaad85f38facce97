//! SAuthc1 and Basic request authentication for the Stormpath client.
//!
//! This crate implements the client side of Stormpath's request
//! authentication: given an outgoing HTTP request and an API key pair, it
//! adds the headers the service requires and an `Authorization` header in
//! one of two shapes:
//!
//! - `SAuthc1` - an HMAC-SHA-256 request signature over a canonical
//!   representation of the request, with a per-request derived signing key
//! - `Basic` - standard HTTP Basic authentication
//!
//! # Overview
//!
//! SAuthc1 signing canonicalizes the request (method, encoded path, sorted
//! encoded query string, sorted signed headers, payload hash), derives a
//! signing key through a fixed chain of HMAC-SHA-256 applications over the
//! date stamp, a per-request nonce, and a terminator constant, and emits the
//! signature as lowercase hex in the `Authorization` header. The
//! construction is deterministic: identical inputs (including the injected
//! clock instant and nonce) always produce identical bytes.
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction for SAuthc1
//! - [`basic`] - HTTP Basic request authentication
//! - [`error`] - Authentication error types
//! - [`request`] - Outgoing request model and the [`RequestAuthenticator`] trait
//! - [`sauthc1`] - SAuthc1 HMAC request signing

pub mod basic;
pub mod canonical;
pub mod error;
pub mod request;
pub mod sauthc1;

pub use basic::BasicRequestAuthenticator;
pub use error::{AuthcError, AuthcResult};
pub use request::{Request, RequestAuthenticator, authenticator_for};
pub use sauthc1::Sauthc1RequestAuthenticator;
