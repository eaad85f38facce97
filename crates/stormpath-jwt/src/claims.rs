//! The JWT claims map.
//!
//! Claims are an ordered map from claim name to JSON value, with typed
//! accessors for the seven reserved claims and arbitrary lookup for custom
//! claims. The map is immutable once parsed or built; mutation happens only
//! through [`crate::JwtBuilder`].

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Reserved claim name: issuer.
pub const ISSUER: &str = "iss";
/// Reserved claim name: subject.
pub const SUBJECT: &str = "sub";
/// Reserved claim name: audience.
pub const AUDIENCE: &str = "aud";
/// Reserved claim name: expiration time.
pub const EXPIRATION: &str = "exp";
/// Reserved claim name: not-before time.
pub const NOT_BEFORE: &str = "nbf";
/// Reserved claim name: issued-at time.
pub const ISSUED_AT: &str = "iat";
/// Reserved claim name: JWT id.
pub const ID: &str = "jti";

/// An immutable set of JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Claims(BTreeMap<String, Value>);

impl Claims {
    /// Wrap a decoded claims map.
    #[must_use]
    pub fn from_map(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }

    /// Look up an arbitrary claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether a claim is present (even with a null value).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.string_claim(ISSUER)
    }

    /// The `sub` claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.string_claim(SUBJECT)
    }

    /// The `aud` claim.
    #[must_use]
    pub fn audience(&self) -> Option<&str> {
        self.string_claim(AUDIENCE)
    }

    /// The `jti` claim.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.string_claim(ID)
    }

    /// The `exp` claim as a UTC instant.
    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.numeric_date_claim(EXPIRATION)
    }

    /// The `nbf` claim as a UTC instant.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.numeric_date_claim(NOT_BEFORE)
    }

    /// The `iat` claim as a UTC instant.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_date_claim(ISSUED_AT)
    }

    /// Access the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    fn string_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Numeric date claims are seconds since the epoch; both integer and
    /// float JSON numbers are accepted, per RFC 7519's NumericDate.
    fn numeric_date_claim(&self, name: &str) -> Option<DateTime<Utc>> {
        let value = self.0.get(name)?;
        #[allow(clippy::cast_possible_truncation)]
        let seconds = value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.trunc() as i64))?;
        Utc.timestamp_opt(seconds, 0).single()
    }
}
