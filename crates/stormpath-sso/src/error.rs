//! SSO callback error types.
//!
//! One variant per failure class; callers branch by pattern matching. None
//! of these failures is retryable: a rejected callback token stays rejected.

use stormpath_core::CacheError;
use stormpath_jwt::JwtError;

/// Errors raised while handling an SSO callback.
#[derive(Debug, thiserror::Error)]
pub enum SsoError {
    /// The callback arrived with a method other than GET.
    #[error("SSO callbacks must use HTTP GET, got {0}")]
    UnsupportedCallbackMethod(http::Method),

    /// The callback URL has no `jwtResponse` query parameter.
    #[error("the jwtResponse query parameter is required")]
    JwtParameterRequired,

    /// The callback token failed parsing or validation.
    #[error(transparent)]
    Jwt(#[from] JwtError),

    /// The token's key id does not name the configured API key.
    #[error("response signed by a different client than expected")]
    ResponseSignedByForeignClient,

    /// The `status` claim holds a value this client does not understand.
    #[error("unknown result status: {0}")]
    UnknownStatus(String),

    /// The `sub` claim is absent and the result status is not LOGOUT.
    #[error("the subject claim is required unless the result status is LOGOUT")]
    SubjectRequired,

    /// The response nonce was already recorded: replay detected.
    #[error("the callback response has already been consumed")]
    NonceAlreadyUsed,

    /// The configured nonce store does not support the invoked execution
    /// mode.
    #[error("nonce store does not support {0} operations")]
    UnsupportedExecutionMode(&'static str),

    /// The nonce store backend failed; the callback must be rejected.
    #[error("nonce store failure: {0}")]
    Nonce(#[from] CacheError),

    /// The service returned a signed error payload instead of a result.
    #[error(transparent)]
    Upstream(UpstreamError),
}

/// A service-signed error payload embedded in a callback token.
#[derive(Debug, Clone, thiserror::Error, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("upstream error {code} (HTTP {status}): {message}")]
pub struct UpstreamError {
    /// Service-specific numeric error code.
    pub code: u32,
    /// HTTP status the service associates with the error.
    #[serde(default)]
    pub status: u16,
    /// End-user-safe message.
    #[serde(default)]
    pub message: String,
    /// Developer-facing message.
    #[serde(default)]
    pub developer_message: String,
    /// Link to further documentation.
    #[serde(default)]
    pub more_info: String,
}

impl UpstreamError {
    /// Classify the error by its numeric code.
    #[must_use]
    pub fn kind(&self) -> UpstreamErrorKind {
        match self.code {
            12001 => UpstreamErrorKind::SessionTimeout,
            10011 | 10012 | 11001 | 11002 | 11003 => UpstreamErrorKind::InvalidToken,
            _ => UpstreamErrorKind::Runtime,
        }
    }
}

/// Families of upstream errors, selected by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The SSO session timed out (code 12001).
    SessionTimeout,
    /// The token the client sent was rejected (codes 10011, 10012,
    /// 11001-11003).
    InvalidToken,
    /// Any other service-side failure.
    Runtime,
}

/// Convenience result type for SSO operations.
pub type SsoResult<T> = Result<T, SsoError>;
