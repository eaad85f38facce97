//! Error types for the Stormpath client core.

/// Core error type for the Stormpath client infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// API key id or secret is empty or otherwise unusable.
    #[error("invalid API key: {0}")]
    InvalidApiKey(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
