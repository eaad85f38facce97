//! ID-Site callback handling.

use std::fmt;
use std::sync::Arc;

use stormpath_core::{ApiKey, Clock};

use crate::callback::CallbackCore;
use crate::error::SsoResult;
use crate::nonce::NonceStores;
use crate::result::{AccountResult, AccountResultStatus};

/// Receives the validated outcome of an ID-Site callback.
///
/// All methods default to no-ops; implementors override the outcomes they
/// care about. The matching method is invoked before the result is returned
/// to the caller.
pub trait IdSiteResultListener: Send + Sync {
    /// A user authenticated against an existing account.
    fn on_authenticated(&self, result: &AccountResult) {
        let _ = result;
    }

    /// A user registered a new account.
    fn on_registered(&self, result: &AccountResult) {
        let _ = result;
    }

    /// A user logged out.
    fn on_logout(&self, result: &AccountResult) {
        let _ = result;
    }
}

/// Handler for ID-Site SSO callbacks.
///
/// Validates the `jwtResponse` token of an inbound callback request and
/// produces an [`AccountResult`]. Both a synchronous and an asynchronous
/// path are supported, with identical validation order; the asynchronous
/// path only awaits during the nonce-store round trip.
pub struct IdSiteCallbackHandler {
    core: CallbackCore,
    listener: Option<Arc<dyn IdSiteResultListener>>,
}

impl IdSiteCallbackHandler {
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
    pub fn with_listener(mut self, listener: Arc<dyn IdSiteResultListener>) -> Self {
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
                AccountResultStatus::Registered => listener.on_registered(result),
                AccountResultStatus::Logout => listener.on_logout(result),
            }
        }
    }
}

impl fmt::Debug for IdSiteCallbackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdSiteCallbackHandler")
            .field("core", &self.core)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
