//! The callback validation state machine shared by ID-Site and SAML.
//!
//! Both SSO flows deliver their outcome the same way: the identity service
//! redirects the browser back to the application with a signed JWT in the
//! `jwtResponse` query parameter. Validation is ordered and fail-fast; no
//! partial result is ever returned:
//!
//! 1. Only HTTP GET is accepted; the `jwtResponse` parameter must be present.
//! 2. Parse the token structurally, without a key.
//! 3. Require the protocol claims, unless the payload is a service-signed
//!    error object.
//! 4. Resolve the signing key id: the `aud` claim for result payloads, the
//!    header `kid` for error payloads. It must name the configured API key.
//! 5. Verify the signature with the configured secret.
//! 6. Verify the token lifetime against the injected clock.
//! 7. Surface error payloads as [`SsoError::Upstream`].
//! 8. Require `sub` unless the status is LOGOUT (logging out twice is legal
//!    and carries no account).
//! 9. Check, then record, the response nonce. The two store calls are
//!    deliberately not atomic; see [`crate::nonce`].
//! 10. Build the immutable [`AccountResult`].

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use stormpath_core::{ApiKey, Clock};
use stormpath_jwt::{JwtError, JwtParser, claims, header, validate_lifetime, validate_signature};
use tracing::debug;

use crate::error::{SsoError, SsoResult, UpstreamError};
use crate::nonce::NonceStores;
use crate::result::{AccountResult, AccountResultStatus};

/// The query parameter carrying the callback token.
pub const JWT_RESPONSE_PARAM: &str = "jwtResponse";

const STATUS_CLAIM: &str = "status";
const IS_NEW_SUBJECT_CLAIM: &str = "isNewSub";
const STATE_CLAIM: &str = "state";
const RESPONSE_ID_CLAIM: &str = "irt";
const ERROR_CLAIM: &str = "err";

/// Claims every result payload must carry.
const REQUIRED_CLAIMS: &[&str] = &[
    claims::ISSUER,
    claims::AUDIENCE,
    claims::EXPIRATION,
    RESPONSE_ID_CLAIM,
    STATUS_CLAIM,
    IS_NEW_SUBJECT_CLAIM,
];

/// Shared callback validation core.
///
/// The ID-Site and SAML handlers are thin fronts over this: same validation
/// order, different listener interfaces.
#[derive(Debug)]
pub(crate) struct CallbackCore {
    api_key: ApiKey,
    clock: Arc<dyn Clock>,
    stores: NonceStores,
}

/// Claims extracted and validated through step 8, before the nonce round
/// trip.
pub(crate) struct ValidatedCallback {
    response_id: String,
    account_href: Option<String>,
    state: Option<String>,
    is_new_account: bool,
    status: AccountResultStatus,
}

impl ValidatedCallback {
    fn into_result(self) -> AccountResult {
        AccountResult::new(
            self.account_href,
            self.state,
            self.is_new_account,
            self.status,
        )
    }
}

impl CallbackCore {
    pub(crate) fn new(api_key: ApiKey, clock: Arc<dyn Clock>, stores: NonceStores) -> Self {
        Self {
            api_key,
            clock,
            stores,
        }
    }

    /// Run the synchronous path: validate, then check-and-record the nonce.
    pub(crate) fn get_account_result(
        &self,
        parts: &http::request::Parts,
    ) -> SsoResult<AccountResult> {
        let validated = self.validate(parts)?;

        let store = self.stores.require_sync()?;
        if store.contains_nonce(&validated.response_id)? {
            debug!("callback response nonce already consumed");
            return Err(SsoError::NonceAlreadyUsed);
        }
        store.put_nonce(&validated.response_id)?;

        Ok(validated.into_result())
    }

    /// Run the asynchronous path. Identical validation order; only the nonce
    /// round trip awaits.
    pub(crate) async fn get_account_result_async(
        &self,
        parts: &http::request::Parts,
    ) -> SsoResult<AccountResult> {
        let validated = self.validate(parts)?;

        let store = self.stores.require_async()?;
        if store.contains_nonce(&validated.response_id).await? {
            debug!("callback response nonce already consumed");
            return Err(SsoError::NonceAlreadyUsed);
        }
        store.put_nonce(&validated.response_id).await?;

        Ok(validated.into_result())
    }

    /// Steps 1-8: everything up to (but excluding) the nonce round trip.
    /// Pure CPU work; no I/O.
    fn validate(&self, parts: &http::request::Parts) -> SsoResult<ValidatedCallback> {
        if parts.method != http::Method::GET {
            return Err(SsoError::UnsupportedCallbackMethod(parts.method.clone()));
        }

        let token = query_param(parts.uri.query().unwrap_or(""), JWT_RESPONSE_PARAM)
            .filter(|token| !token.is_empty())
            .ok_or(SsoError::JwtParameterRequired)?;

        let parsed = JwtParser::new().parse(&token)?;
        let token_claims = parsed.claims();

        let is_error_payload = token_claims.contains(ERROR_CLAIM);
        if !is_error_payload {
            for name in REQUIRED_CLAIMS {
                if !token_claims.contains(name) {
                    return Err(JwtError::MissingClaim((*name).to_owned()).into());
                }
            }
        }

        // Error payloads are signed by the service itself, so the key id
        // lives in the header; result payloads name the client in `aud`.
        let key_id = if is_error_payload {
            parsed
                .header()
                .key_id()
                .ok_or_else(|| JwtError::MissingClaim(header::KEY_ID.to_owned()))?
        } else {
            token_claims
                .audience()
                .ok_or_else(|| JwtError::MissingClaim(claims::AUDIENCE.to_owned()))?
        };
        if !self.api_key.id_matches(key_id) {
            debug!(key_id, "callback token names a foreign API key");
            return Err(SsoError::ResponseSignedByForeignClient);
        }

        validate_signature(
            parsed.base64_header(),
            parsed.base64_payload(),
            parsed.base64_signature(),
            self.api_key.secret().as_bytes(),
        )?;

        validate_lifetime(token_claims, self.clock.now())?;

        if is_error_payload {
            let err_value = token_claims
                .get(ERROR_CLAIM)
                .cloned()
                .unwrap_or(Value::Null);
            let upstream: UpstreamError = serde_json::from_value(err_value)
                .map_err(|_| JwtError::Malformed("err claim is not a valid error object"))?;
            debug!(code = upstream.code, "callback carries an upstream error payload");
            return Err(SsoError::Upstream(upstream));
        }

        let status = token_claims
            .get(STATUS_CLAIM)
            .and_then(Value::as_str)
            .ok_or(JwtError::Malformed("status claim must be a string"))?
            .parse::<AccountResultStatus>()?;

        let account_href = token_claims.subject().map(ToOwned::to_owned);
        if account_href.is_none() && status != AccountResultStatus::Logout {
            return Err(SsoError::SubjectRequired);
        }

        let response_id = token_claims
            .get(RESPONSE_ID_CLAIM)
            .and_then(Value::as_str)
            .ok_or(JwtError::Malformed("irt claim must be a string"))?
            .to_owned();

        let is_new_account = token_claims
            .get(IS_NEW_SUBJECT_CLAIM)
            .and_then(Value::as_bool)
            .ok_or(JwtError::Malformed("isNewSub claim must be a boolean"))?;

        let state = token_claims
            .get(STATE_CLAIM)
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        debug!(?status, "callback token validated");

        Ok(ValidatedCallback {
            response_id,
            account_href,
            state,
            is_new_account,
            status,
        })
    }
}

/// Extract the first occurrence of `name` from a raw query string,
/// form-decoding the value.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (form_decode(key) == name).then(|| form_decode(value))
        })
}

fn form_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
