//! Structural JWT parsing with ordered fail-fast validation.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL;
use serde_json::Value;

use crate::claims::Claims;
use crate::error::{JwtError, JwtResult};
use crate::header::{ALGORITHM_HS256, JwtHeader};
use crate::validate::validate_signature;

/// A parsed JWT.
///
/// The three base64url segments are retained verbatim so callers can
/// re-verify the signature later, byte-exact, once they know which key to
/// use; re-encoding the decoded maps would not be guaranteed to round-trip.
#[derive(Debug, Clone)]
pub struct ParsedJwt {
    base64_header: String,
    base64_payload: String,
    base64_signature: String,
    header: JwtHeader,
    claims: Claims,
}

impl ParsedJwt {
    /// The header segment exactly as it appeared in the token.
    #[must_use]
    pub fn base64_header(&self) -> &str {
        &self.base64_header
    }

    /// The payload segment exactly as it appeared in the token.
    #[must_use]
    pub fn base64_payload(&self) -> &str {
        &self.base64_payload
    }

    /// The signature segment exactly as it appeared in the token.
    #[must_use]
    pub fn base64_signature(&self) -> &str {
        &self.base64_signature
    }

    /// The decoded header.
    #[must_use]
    pub fn header(&self) -> &JwtHeader {
        &self.header
    }

    /// The decoded claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// A configurable JWT parser.
///
/// With no configuration, [`parse`](Self::parse) validates structure only.
/// A configured signing key adds inline signature verification; registered
/// claim assertions add required-claim checks. Validation is ordered and
/// fail-fast: structure, algorithm, signature, claims.
#[derive(Clone, Default)]
pub struct JwtParser {
    signing_key: Option<Vec<u8>>,
    required_claims: Vec<(String, Value)>,
}

impl std::fmt::Debug for JwtParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtParser")
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("required_claims", &self.required_claims)
            .finish()
    }
}

impl JwtParser {
    /// Create a parser that validates structure only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify signatures against `key` during parsing.
    #[must_use]
    pub fn signing_key(mut self, key: &[u8]) -> Self {
        self.signing_key = Some(key.to_vec());
        self
    }

    /// Require the `iss` claim to equal `value`.
    #[must_use]
    pub fn require_issuer(self, value: impl Into<Value>) -> Self {
        self.require_claim(crate::claims::ISSUER, value.into())
    }

    /// Require the `sub` claim to equal `value`.
    #[must_use]
    pub fn require_subject(self, value: impl Into<Value>) -> Self {
        self.require_claim(crate::claims::SUBJECT, value.into())
    }

    /// Require the `aud` claim to equal `value`.
    #[must_use]
    pub fn require_audience(self, value: impl Into<Value>) -> Self {
        self.require_claim(crate::claims::AUDIENCE, value.into())
    }

    /// Require the `jti` claim to equal `value`.
    #[must_use]
    pub fn require_id(self, value: impl Into<Value>) -> Self {
        self.require_claim(crate::claims::ID, value.into())
    }

    /// Require the `exp` claim to equal the given epoch-second instant.
    #[must_use]
    pub fn require_expiration(self, value: chrono::DateTime<chrono::Utc>) -> Self {
        self.require_claim(crate::claims::EXPIRATION, Value::from(value.timestamp()))
    }

    /// Require the `nbf` claim to equal the given epoch-second instant.
    #[must_use]
    pub fn require_not_before(self, value: chrono::DateTime<chrono::Utc>) -> Self {
        self.require_claim(crate::claims::NOT_BEFORE, Value::from(value.timestamp()))
    }

    /// Require the `iat` claim to equal the given epoch-second instant.
    #[must_use]
    pub fn require_issued_at(self, value: chrono::DateTime<chrono::Utc>) -> Self {
        self.require_claim(crate::claims::ISSUED_AT, Value::from(value.timestamp()))
    }

    /// Require an arbitrary claim to equal `value`.
    #[must_use]
    pub fn require_claim(mut self, name: &str, value: Value) -> Self {
        self.required_claims.push((name.to_owned(), value));
        self
    }

    /// Parse and validate `token`.
    ///
    /// # Errors
    ///
    /// In order: [`JwtError::Required`] for an empty string;
    /// [`JwtError::Malformed`] for anything but three non-empty segments or
    /// undecodable header/payload; [`JwtError::UnsupportedAlgorithm`] for an
    /// algorithm other than HS256; [`JwtError::InvalidSignature`] when a key
    /// is configured and does not match; [`JwtError::MissingClaim`] /
    /// [`JwtError::MismatchedClaim`] for failed claim assertions.
    pub fn parse(&self, token: &str) -> JwtResult<ParsedJwt> {
        if token.trim().is_empty() {
            return Err(JwtError::Required);
        }

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(JwtError::Malformed(
                "exactly three dot-separated segments are required",
            ));
        }
        let (base64_header, base64_payload, base64_signature) =
            (segments[0], segments[1], segments[2]);
        if base64_payload.is_empty() {
            return Err(JwtError::Malformed("payload segment is missing"));
        }
        if base64_header.is_empty() || base64_signature.is_empty() {
            return Err(JwtError::Malformed("header and signature segments must not be empty"));
        }

        let header = JwtHeader::from_map(decode_json_segment(
            base64_header,
            "header is not valid base64url",
            "header is not a JSON object",
        )?);
        match header.algorithm() {
            Some(ALGORITHM_HS256) => {}
            Some(other) => return Err(JwtError::UnsupportedAlgorithm(other.to_owned())),
            None => return Err(JwtError::Malformed("header does not declare an algorithm")),
        }

        if let Some(key) = &self.signing_key {
            validate_signature(base64_header, base64_payload, base64_signature, key)?;
        }

        let claims = Claims::from_map(decode_json_segment(
            base64_payload,
            "payload is not valid base64url",
            "payload is not a JSON object",
        )?);

        for (name, expected) in &self.required_claims {
            match claims.get(name) {
                None => return Err(JwtError::MissingClaim(name.clone())),
                Some(actual) if actual != expected => {
                    return Err(JwtError::MismatchedClaim(name.clone()));
                }
                Some(_) => {}
            }
        }

        Ok(ParsedJwt {
            base64_header: base64_header.to_owned(),
            base64_payload: base64_payload.to_owned(),
            base64_signature: base64_signature.to_owned(),
            header,
            claims,
        })
    }
}

fn decode_json_segment(
    segment: &str,
    not_base64: &'static str,
    not_json: &'static str,
) -> JwtResult<BTreeMap<String, Value>> {
    let bytes = BASE64_URL
        .decode(segment)
        .map_err(|_| JwtError::Malformed(not_base64))?;
    serde_json::from_slice(&bytes).map_err(|_| JwtError::Malformed(not_json))
}
