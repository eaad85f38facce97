//! Common type definitions shared across the client.

use std::fmt;

use crate::CoreError;

/// Stormpath API key pair used to authenticate outbound requests and to
/// verify SSO callback tokens.
///
/// The secret is opaque key material: it is excluded from the `Debug`
/// representation and must never appear in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    id: String,
    secret: String,
}

impl ApiKey {
    /// Create a new API key pair.
    ///
    /// # Errors
    /// Returns an error if the id or secret is empty.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        let secret = secret.into();
        if id.is_empty() {
            return Err(CoreError::InvalidApiKey("id must not be empty"));
        }
        if secret.is_empty() {
            return Err(CoreError::InvalidApiKey("secret must not be empty"));
        }
        Ok(Self { id, secret })
    }

    /// Get the key id as a string slice.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the key secret as a string slice.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether `candidate` names this key, compared case-insensitively.
    ///
    /// Key ids arriving in callback tokens may differ in case from the
    /// configured id, so equality checks go through this helper.
    #[must_use]
    pub fn id_matches(&self, candidate: &str) -> bool {
        self.id.eq_ignore_ascii_case(candidate)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
