//! The JOSE header map.

use std::collections::BTreeMap;

use serde_json::Value;

/// The only signature algorithm the protocol supports.
pub const ALGORITHM_HS256: &str = "HS256";

/// Header parameter name: algorithm.
pub const ALGORITHM: &str = "alg";
/// Header parameter name: key id.
pub const KEY_ID: &str = "kid";
/// Header parameter name: token type.
pub const TYPE: &str = "typ";

/// An immutable decoded JOSE header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JwtHeader(BTreeMap<String, Value>);

impl JwtHeader {
    /// Wrap a decoded header map.
    #[must_use]
    pub fn from_map(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }

    /// Look up an arbitrary header parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The `alg` parameter.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get(ALGORITHM).and_then(Value::as_str)
    }

    /// The `kid` parameter.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.0.get(KEY_ID).and_then(Value::as_str)
    }

    /// The `typ` parameter.
    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        self.0.get(TYPE).and_then(Value::as_str)
    }

    /// Access the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }
}
