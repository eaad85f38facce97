//! SAuthc1 HMAC request signing.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! SAuthc1 sauthc1Id=<keyId>/<yyyyMMdd>/<nonce>/sauthc1_request,
//!         sauthc1SignedHeaders=host;x-stormpath-date,
//!         sauthc1Signature=<64-hex-char HMAC-SHA-256>
//! ```
//!
//! The signature covers a string to sign of:
//!
//! ```text
//! HMAC-SHA-256\n
//! <timestamp>\n
//! <keyId>/<dateStamp>/<nonce>/sauthc1_request\n
//! hex(SHA-256(CanonicalRequest))
//! ```
//!
//! and the signing key is derived per request through a fixed chain:
//! `kSecret = "SAuthc1" + apiKeySecret`, `kDate = HMAC(kSecret, dateStamp)`,
//! `kNonce = HMAC(kDate, nonce)`, `kSigning = HMAC(kNonce, "sauthc1_request")`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use http::HeaderValue;
use sha2::{Digest, Sha256};
use stormpath_core::{ApiKey, Clock};
use tracing::debug;
use uuid::Uuid;

use crate::canonical::{canonical_request, signed_headers_string};
use crate::error::{AuthcError, AuthcResult};
use crate::request::{Request, RequestAuthenticator};

/// Authentication scheme name, also the prefix of the derived secret key.
pub const AUTHENTICATION_SCHEME: &str = "SAuthc1";

/// Terminator constant closing the credential id and the key-derivation chain.
pub const ID_TERMINATOR: &str = "sauthc1_request";

/// Algorithm name, the first line of the string to sign.
const ALGORITHM: &str = "HMAC-SHA-256";

const HOST_HEADER: &str = "Host";
const STORMPATH_DATE_HEADER: &str = "X-Stormpath-Date";
const SAUTHC1_ID: &str = "sauthc1Id";
const SAUTHC1_SIGNED_HEADERS: &str = "sauthc1SignedHeaders";
const SAUTHC1_SIGNATURE: &str = "sauthc1Signature";

const DATE_FORMAT: &str = "%Y%m%d";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

type HmacSha256 = Hmac<Sha256>;

/// Request authenticator implementing the SAuthc1 signing scheme.
///
/// Each call to [`RequestAuthenticator::authenticate`] signs with the current
/// instant from the injected clock and a fresh v4 UUID nonce. Tests that need
/// byte-identical output use [`sign_with`] directly.
#[derive(Debug, Clone)]
pub struct Sauthc1RequestAuthenticator {
    clock: Arc<dyn Clock>,
}

impl Sauthc1RequestAuthenticator {
    /// Create an authenticator that draws timestamps from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl RequestAuthenticator for Sauthc1RequestAuthenticator {
    fn authenticate(&self, request: &mut Request, api_key: &ApiKey) -> AuthcResult<()> {
        let nonce = Uuid::new_v4().to_string();
        sign_with(request, api_key, self.clock.now(), &nonce)
    }
}

/// Sign `request` with an explicit instant and nonce.
///
/// This is the full SAuthc1 algorithm; the instant and nonce are parameters
/// so that signing is deterministic under test. Mutates the request: sets
/// `Host`, `X-Stormpath-Date`, and `Authorization`.
///
/// # Errors
///
/// Returns [`AuthcError::RequestUriRequired`] if the request URI has no host.
pub fn sign_with(
    request: &mut Request,
    api_key: &ApiKey,
    now: DateTime<Utc>,
    nonce: &str,
) -> AuthcResult<()> {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let date_stamp = now.format(DATE_FORMAT).to_string();

    let host = host_header_value(request)?;
    set_header(request, HOST_HEADER, &host)?;
    set_header(request, STORMPATH_DATE_HEADER, &timestamp)?;

    let method = request.method().as_str().to_owned();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().unwrap_or("").to_owned();
    let payload_hash = hex::encode(Sha256::digest(request.body()));

    // The signed header set is fixed by the protocol, independent of any
    // other headers the request carries.
    let signed_headers = ["host", "x-stormpath-date"];
    let header_pairs = [("host", host.as_str()), ("x-stormpath-date", timestamp.as_str())];

    let canonical = canonical_request(
        &method,
        &path,
        &query,
        &header_pairs,
        &signed_headers,
        &payload_hash,
    );
    let canonical_hash = hex::encode(Sha256::digest(canonical.as_bytes()));

    let id = format!(
        "{}/{date_stamp}/{nonce}/{ID_TERMINATOR}",
        api_key.id()
    );
    let string_to_sign = format!("{ALGORITHM}\n{timestamp}\n{id}\n{canonical_hash}");

    let signing_key = derive_signing_key(api_key.secret(), &date_stamp, nonce);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let signed_headers_str = signed_headers_string(&signed_headers);
    let authorization = format!(
        "{AUTHENTICATION_SCHEME} {SAUTHC1_ID}={id}, \
         {SAUTHC1_SIGNED_HEADERS}={signed_headers_str}, \
         {SAUTHC1_SIGNATURE}={signature}"
    );
    set_header(request, http::header::AUTHORIZATION.as_str(), &authorization)?;

    debug!(key_id = %api_key.id(), %timestamp, "signed request with SAuthc1");

    Ok(())
}

/// Derive the per-request signing key.
///
/// `kSecret = "SAuthc1" + secret`; each link in the chain keys an
/// HMAC-SHA-256 over the next input: date stamp, nonce, terminator.
#[must_use]
pub fn derive_signing_key(secret: &str, date_stamp: &str, nonce: &str) -> Vec<u8> {
    let k_secret = format!("{AUTHENTICATION_SCHEME}{secret}");
    let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
    let k_nonce = hmac_sha256(&k_date, nonce.as_bytes());
    hmac_sha256(&k_nonce, ID_TERMINATOR.as_bytes())
}

/// Compute a raw HMAC-SHA-256 tag.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the `Host` header value: the URI host, plus `:port` when the port
/// is not the default for the scheme.
fn host_header_value(request: &Request) -> AuthcResult<String> {
    let uri = request.uri();
    let host = uri.host().ok_or(AuthcError::RequestUriRequired)?;

    let default_port = match uri.scheme_str() {
        Some("http") => 80,
        _ => 443,
    };

    Ok(match uri.port_u16() {
        Some(port) if port != default_port => format!("{host}:{port}"),
        _ => host.to_owned(),
    })
}

fn set_header(request: &mut Request, name: &'static str, value: &str) -> AuthcResult<()> {
    let value = HeaderValue::from_str(value).map_err(|_| AuthcError::InvalidHeaderValue(name))?;
    let name: http::header::HeaderName = name.parse().expect("fixed header names are valid");
    request.headers_mut().insert(name, value);
    Ok(())
}
