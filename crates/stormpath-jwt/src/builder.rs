//! Fluent JWT construction and signing.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::claims;
use crate::error::{JwtError, JwtResult};
use crate::header::{ALGORITHM, ALGORITHM_HS256};

type HmacSha256 = Hmac<Sha256>;

/// A mutable, fluent JWT builder.
///
/// Setting any claim or header parameter to [`Value::Null`] removes it
/// instead of storing a null. This is a documented contract: callers clear a
/// previously-set claim by setting it to null, and no payload ever carries
/// an explicit `null` value.
///
/// # Examples
///
/// ```
/// use stormpath_jwt::{JwtBuilder, JwtParser};
///
/// let token = JwtBuilder::new()
///     .issuer("https://api.stormpath.com/v1")
///     .subject("accounts/abc")
///     .claim("status", "AUTHENTICATED".into())
///     .sign_with(b"secret")
///     .unwrap();
///
/// let parsed = JwtParser::new().signing_key(b"secret").parse(&token).unwrap();
/// assert_eq!(parsed.claims().issuer(), Some("https://api.stormpath.com/v1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JwtBuilder {
    header: BTreeMap<String, Value>,
    claims: BTreeMap<String, Value>,
}

impl JwtBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `iss` claim.
    #[must_use]
    pub fn issuer(self, value: impl Into<Value>) -> Self {
        self.claim(claims::ISSUER, value.into())
    }

    /// Set the `sub` claim.
    #[must_use]
    pub fn subject(self, value: impl Into<Value>) -> Self {
        self.claim(claims::SUBJECT, value.into())
    }

    /// Set the `aud` claim.
    #[must_use]
    pub fn audience(self, value: impl Into<Value>) -> Self {
        self.claim(claims::AUDIENCE, value.into())
    }

    /// Set the `jti` claim.
    #[must_use]
    pub fn id(self, value: impl Into<Value>) -> Self {
        self.claim(claims::ID, value.into())
    }

    /// Set the `exp` claim from a UTC instant.
    #[must_use]
    pub fn expiration(self, value: DateTime<Utc>) -> Self {
        self.claim(claims::EXPIRATION, Value::from(value.timestamp()))
    }

    /// Set the `nbf` claim from a UTC instant.
    #[must_use]
    pub fn not_before(self, value: DateTime<Utc>) -> Self {
        self.claim(claims::NOT_BEFORE, Value::from(value.timestamp()))
    }

    /// Set the `iat` claim from a UTC instant.
    #[must_use]
    pub fn issued_at(self, value: DateTime<Utc>) -> Self {
        self.claim(claims::ISSUED_AT, Value::from(value.timestamp()))
    }

    /// Set an arbitrary claim. A [`Value::Null`] removes the claim.
    #[must_use]
    pub fn claim(mut self, name: &str, value: Value) -> Self {
        if value.is_null() {
            self.claims.remove(name);
        } else {
            self.claims.insert(name.to_owned(), value);
        }
        self
    }

    /// Set an arbitrary header parameter. A [`Value::Null`] removes it.
    ///
    /// Setting `alg` to anything other than `HS256` makes [`sign_with`](Self::sign_with)
    /// fail; no other algorithm is supported.
    #[must_use]
    pub fn header_param(mut self, name: &str, value: Value) -> Self {
        if value.is_null() {
            self.header.remove(name);
        } else {
            self.header.insert(name.to_owned(), value);
        }
        self
    }

    /// Serialize, encode, and sign the token with an HMAC-SHA-256 key.
    ///
    /// The signature is computed over exactly
    /// `base64url(header) + "." + base64url(payload)`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::UnsupportedAlgorithm`] if a header parameter
    /// requested an algorithm other than HS256, or [`JwtError::Json`] if
    /// serialization fails.
    pub fn sign_with(self, key: &[u8]) -> JwtResult<String> {
        let mut header = self.header;
        match header.get(ALGORITHM).and_then(Value::as_str) {
            None => {
                header.insert(ALGORITHM.to_owned(), Value::from(ALGORITHM_HS256));
            }
            Some(ALGORITHM_HS256) => {}
            Some(other) => return Err(JwtError::UnsupportedAlgorithm(other.to_owned())),
        }

        let encoded_header = BASE64_URL.encode(serde_json::to_vec(&header)?);
        let encoded_payload = BASE64_URL.encode(serde_json::to_vec(&self.claims)?);

        let signing_input = format!("{encoded_header}.{encoded_payload}");
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept any key length");
        mac.update(signing_input.as_bytes());
        let signature = BASE64_URL.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_build_three_segment_compact_token() {
        let token = JwtBuilder::new()
            .issuer("iss-value")
            .sign_with(b"secret")
            .unwrap();
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| !s.is_empty()));
        // base64url, no padding
        assert!(!token.contains('='));
    }

    #[test]
    fn test_should_force_hs256_algorithm_in_header() {
        let token = JwtBuilder::new().sign_with(b"secret").unwrap();
        let header_json = BASE64_URL
            .decode(token.split('.').next().unwrap())
            .unwrap();
        let header: Value = serde_json::from_slice(&header_json).unwrap();
        assert_eq!(header[ALGORITHM], json!("HS256"));
    }

    #[test]
    fn test_should_reject_other_algorithms() {
        let result = JwtBuilder::new()
            .header_param(ALGORITHM, json!("RS256"))
            .sign_with(b"secret");
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(alg)) if alg == "RS256"));
    }

    #[test]
    fn test_should_remove_claim_when_set_to_null() {
        let token = JwtBuilder::new()
            .issuer("iss-value")
            .subject("sub-value")
            .claim(crate::claims::SUBJECT, Value::Null)
            .sign_with(b"secret")
            .unwrap();

        let payload_json = BASE64_URL
            .decode(token.split('.').nth(1).unwrap())
            .unwrap();
        let payload: Value = serde_json::from_slice(&payload_json).unwrap();
        assert_eq!(payload["iss"], json!("iss-value"));
        assert!(payload.get("sub").is_none());
    }

    #[test]
    fn test_should_sign_deterministically_for_fixed_input() {
        let build = || {
            JwtBuilder::new()
                .issuer("iss-value")
                .claim("custom", json!(42))
                .sign_with(b"secret")
                .unwrap()
        };
        assert_eq!(build(), build());
    }
}
