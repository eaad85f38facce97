//! HTTP Basic request authentication.
//!
//! The simpler of the two strategies: no canonicalization, just
//! `Authorization: Basic base64(id:secret)` plus the `X-Stormpath-Date`
//! header the service requires on every authenticated request.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::HeaderValue;
use stormpath_core::{ApiKey, Clock};
use tracing::debug;

use crate::error::{AuthcError, AuthcResult};
use crate::request::{Request, RequestAuthenticator};

const STORMPATH_DATE_HEADER: &str = "X-Stormpath-Date";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Request authenticator implementing HTTP Basic authentication.
#[derive(Debug, Clone)]
pub struct BasicRequestAuthenticator {
    clock: Arc<dyn Clock>,
}

impl BasicRequestAuthenticator {
    /// Create an authenticator that draws timestamps from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl RequestAuthenticator for BasicRequestAuthenticator {
    fn authenticate(&self, request: &mut Request, api_key: &ApiKey) -> AuthcResult<()> {
        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let credentials = BASE64.encode(format!("{}:{}", api_key.id(), api_key.secret()));
        let authorization = format!("Basic {credentials}");

        let timestamp = HeaderValue::from_str(&timestamp)
            .map_err(|_| AuthcError::InvalidHeaderValue(STORMPATH_DATE_HEADER))?;
        let authorization = HeaderValue::from_str(&authorization)
            .map_err(|_| AuthcError::InvalidHeaderValue("Authorization"))?;

        request
            .headers_mut()
            .insert("x-stormpath-date", timestamp);
        request
            .headers_mut()
            .insert(http::header::AUTHORIZATION, authorization);

        debug!(key_id = %api_key.id(), "authenticated request with Basic scheme");

        Ok(())
    }
}
