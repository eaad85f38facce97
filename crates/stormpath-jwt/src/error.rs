//! JWT error types.
//!
//! One variant per failure class so callers can pattern-match instead of
//! inspecting exception hierarchies. Signature failures never reveal the
//! expected signature or any key material.

use chrono::{DateTime, Utc};

/// Errors raised while building, parsing, or validating a JWT.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The token string was empty.
    #[error("JWT string is required")]
    Required,

    /// The token string is structurally invalid.
    #[error("malformed JWT: {0}")]
    Malformed(&'static str),

    /// The header declares an algorithm other than HS256.
    #[error("unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The signature does not match the header and payload.
    #[error("JWT signature does not match")]
    InvalidSignature,

    /// The `exp` claim is at or before the validation instant.
    #[error("JWT expired at {expired_at}")]
    Expired {
        /// The instant the token expired.
        expired_at: DateTime<Utc>,
    },

    /// The `nbf` claim is after the validation instant.
    #[error("JWT must not be accepted before {not_before}")]
    NotYetValid {
        /// The earliest instant the token may be accepted.
        not_before: DateTime<Utc>,
    },

    /// The `iat` claim is after the validation instant.
    #[error("JWT issued in the future at {issued_at}")]
    IssuedInFuture {
        /// The claimed issue instant.
        issued_at: DateTime<Utc>,
    },

    /// A required claim is absent.
    #[error("required JWT claim is missing: {0}")]
    MissingClaim(String),

    /// A required claim is present with a different value.
    #[error("JWT claim does not have the required value: {0}")]
    MismatchedClaim(String),

    /// Header or claims JSON could not be serialized or deserialized.
    #[error("JWT JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for JWT operations.
pub type JwtResult<T> = Result<T, JwtError>;
