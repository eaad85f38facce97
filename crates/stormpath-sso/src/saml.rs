//! SAML callback handling.
//!
//! The SAML flow delivers its outcome exactly like ID-Site: the service
//! redirects back with a signed `jwtResponse` token. Validation is identical;
//! only the listener surface differs, because SAML flows authenticate and
//! log out but never register accounts.

use std::fmt;
use std::sync::Arc;

use stormpath_core::{ApiKey, Clock};

use crate::callback::CallbackCore;
use crate::error::SsoResult;
use crate::nonce::NonceStores;
use crate::result::{AccountResult, AccountResultStatus};

/// Receives the validated outcome of a SAML callback.
///
/// All methods default to no-ops; implementors override the outcomes they
/// care about.
pub trait SamlResultListener: Send + Sync {
    /// A user authenticated against an existing account.
    fn on_authenticated(&self, result: &AccountResult) {
        let _ = result;
    }

    /// A user logged out.
    fn on_logout(&self, result: &AccountResult) {
        let _ = result;
    }
}

/// Handler for SAML SSO callbacks.
pub struct SamlCallbackHandler {
    core: CallbackCore,
    listener: Option<Arc<dyn SamlResultListener>>,
}

impl SamlCallbackHandler {
    /// Create a handler for the given key material, clock, and nonce stores.
    #[must_use]
    pub fn new(api_key: ApiKey, clock: Arc<dyn Clock>, stores: NonceStores) -> Self {
        Self {
            core: CallbackCore::new(api_key, clock, stores),
            listener: None,
        }
    }

    /// Register a result listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn SamlResultListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Validate the callback request and produce the account result.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::SsoError`] describing the first failed validation
    /// step; no partial result is ever produced.
    pub fn get_account_result(&self, parts: &http::request::Parts) -> SsoResult<AccountResult> {
        let result = self.core.get_account_result(parts)?;
        self.dispatch(&result);
        Ok(result)
    }

    /// The asynchronous twin of [`get_account_result`](Self::get_account_result).
    ///
    /// # Errors
    ///
    /// Same failure modes as the synchronous path.
    pub async fn get_account_result_async(
        &self,
        parts: &http::request::Parts,
    ) -> SsoResult<AccountResult> {
        let result = self.core.get_account_result_async(parts).await?;
        self.dispatch(&result);
        Ok(result)
    }

    fn dispatch(&self, result: &AccountResult) {
        if let Some(listener) = &self.listener {
            match result.status() {
                AccountResultStatus::Authenticated => listener.on_authenticated(result),
                AccountResultStatus::Logout => listener.on_logout(result),
                // SAML flows never register accounts; nothing to dispatch.
                AccountResultStatus::Registered => {}
            }
        }
    }
}

impl fmt::Debug for SamlCallbackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamlCallbackHandler")
            .field("core", &self.core)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
