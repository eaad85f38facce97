//! Standalone signature and lifetime validators.
//!
//! These run outside [`crate::JwtParser`] for the two-pass flow: parse a
//! token without a key, inspect the decoded header/claims to pick key
//! material, then validate explicitly. Both are pure; "now" is a parameter
//! so callers inject their clock.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::claims::Claims;
use crate::error::{JwtError, JwtResult};

type HmacSha256 = Hmac<Sha256>;

/// Recompute the HMAC-SHA-256 over `base64_header.base64_payload` with `key`
/// and compare it against the provided signature segment.
///
/// The comparison is constant-time. The error carries neither the expected
/// signature nor the key.
///
/// # Errors
///
/// Returns [`JwtError::InvalidSignature`] on any mismatch, including a
/// signature segment that is not valid base64url.
pub fn validate_signature(
    base64_header: &str,
    base64_payload: &str,
    base64_signature: &str,
    key: &[u8],
) -> JwtResult<()> {
    let provided = BASE64_URL
        .decode(base64_signature)
        .map_err(|_| JwtError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept any key length");
    mac.update(base64_header.as_bytes());
    mac.update(b".");
    mac.update(base64_payload.as_bytes());
    let expected = mac.finalize().into_bytes();

    if provided.ct_eq(expected.as_slice()).into() {
        Ok(())
    } else {
        debug!("JWT signature mismatch");
        Err(JwtError::InvalidSignature)
    }
}

/// Validate the token lifetime claims against `now`.
///
/// Fails if `exp` is at or before `now`, or if `nbf` or `iat` is strictly
/// after `now`. Absent claims are not checked here; required-claim
/// enforcement is the parser's (or the caller's) concern.
///
/// # Errors
///
/// Returns [`JwtError::Expired`], [`JwtError::NotYetValid`], or
/// [`JwtError::IssuedInFuture`], each carrying the offending timestamp.
pub fn validate_lifetime(claims: &Claims, now: DateTime<Utc>) -> JwtResult<()> {
    if let Some(expired_at) = claims.expiration() {
        if expired_at <= now {
            return Err(JwtError::Expired { expired_at });
        }
    }

    if let Some(not_before) = claims.not_before() {
        if not_before > now {
            return Err(JwtError::NotYetValid { not_before });
        }
    }

    if let Some(issued_at) = claims.issued_at() {
        if issued_at > now {
            return Err(JwtError::IssuedInFuture { issued_at });
        }
    }

    Ok(())
}
