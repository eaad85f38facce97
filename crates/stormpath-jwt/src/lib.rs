//! HS256 JWT construction, parsing, and validation.
//!
//! This crate implements the JWS Compact Serialization subset the Stormpath
//! protocol uses: `base64url(header).base64url(payload).base64url(signature)`
//! with the algorithm restricted to HMAC-SHA-256. Asymmetric schemes are
//! deliberately out of scope.
//!
//! Parsing and validation are split so that callers can run them in two
//! passes: [`JwtParser`] validates structure (and optionally signature and
//! required claims inline), while [`validate_signature`] and
//! [`validate_lifetime`] are standalone checks for flows where the signing
//! key is only known after inspecting the decoded token, as in SSO callback
//! handling.
//!
//! # Modules
//!
//! - [`builder`] - Fluent token construction and signing
//! - [`claims`] - The claims map with typed reserved-claim accessors
//! - [`error`] - JWT error types
//! - [`header`] - The JOSE header map
//! - [`parser`] - Structural parsing with ordered fail-fast validation
//! - [`validate`] - Standalone signature and lifetime validators

pub mod builder;
pub mod claims;
pub mod error;
pub mod header;
pub mod parser;
pub mod validate;

pub use builder::JwtBuilder;
pub use claims::Claims;
pub use error::{JwtError, JwtResult};
pub use header::{ALGORITHM_HS256, JwtHeader};
pub use parser::{JwtParser, ParsedJwt};
pub use validate::{validate_lifetime, validate_signature};
