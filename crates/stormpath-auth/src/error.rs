//! Authentication error types.
//!
//! These errors never carry key material or computed signatures.

/// Errors raised while authenticating an outgoing request.
#[derive(Debug, thiserror::Error)]
pub enum AuthcError {
    /// The request URI has no host, so the `Host` header cannot be computed
    /// and the request cannot be signed.
    #[error("request URI must include a host to be authenticated")]
    RequestUriRequired,

    /// A computed header value was not a valid HTTP header value.
    #[error("invalid value for header {0}")]
    InvalidHeaderValue(&'static str),
}

/// Convenience result type for authentication operations.
pub type AuthcResult<T> = Result<T, AuthcError>;
