//! Client configuration.
//!
//! All configuration is driven by environment variables, matching the
//! `STORMPATH_CLIENT_*` naming the hosted service documents. Key material is
//! required; everything else has a default.

use std::str::FromStr;

use crate::{ApiKey, CoreError};

/// Which request-authentication strategy the client uses for outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthenticationScheme {
    /// SAuthc1 HMAC request signing (the default).
    #[default]
    Sauthc1,
    /// HTTP Basic authentication.
    Basic,
}

impl FromStr for AuthenticationScheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAUTHC1" => Ok(Self::Sauthc1),
            "BASIC" => Ok(Self::Basic),
            other => Err(CoreError::Config(format!(
                "unknown authentication scheme: {other}"
            ))),
        }
    }
}

/// Global configuration for the Stormpath client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key pair used for signing and callback verification.
    pub api_key: ApiKey,
    /// Base URL of the tenant API.
    pub base_url: String,
    /// Outbound request authentication strategy.
    pub authentication_scheme: AuthenticationScheme,
    /// TTL in seconds for recorded SSO nonces. Must exceed the validity
    /// window of callback tokens (at most 60 seconds).
    pub nonce_ttl_secs: u64,
}

impl ClientConfig {
    /// Default tenant API base URL.
    pub const DEFAULT_BASE_URL: &str = "https://api.stormpath.com/v1";

    /// Default nonce TTL in seconds.
    pub const DEFAULT_NONCE_TTL_SECS: u64 = 300;

    /// Create a configuration with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            authentication_scheme: AuthenticationScheme::default(),
            nonce_ttl_secs: Self::DEFAULT_NONCE_TTL_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `STORMPATH_CLIENT_APIKEY_ID` and `STORMPATH_CLIENT_APIKEY_SECRET` are
    /// required; `STORMPATH_CLIENT_BASEURL`,
    /// `STORMPATH_CLIENT_AUTHENTICATION_SCHEME` and
    /// `STORMPATH_CLIENT_NONCE_TTL_SECS` are optional.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if key material is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, CoreError> {
        let id = require_env("STORMPATH_CLIENT_APIKEY_ID")?;
        let secret = require_env("STORMPATH_CLIENT_APIKEY_SECRET")?;
        let mut config = Self::new(ApiKey::new(id, secret)?);

        if let Ok(v) = std::env::var("STORMPATH_CLIENT_BASEURL") {
            config.base_url = v;
        }
        if let Ok(v) = std::env::var("STORMPATH_CLIENT_AUTHENTICATION_SCHEME") {
            config.authentication_scheme = v.parse()?;
        }
        if let Ok(v) = std::env::var("STORMPATH_CLIENT_NONCE_TTL_SECS") {
            config.nonce_ttl_secs = v.parse().map_err(|_| {
                CoreError::Config("invalid STORMPATH_CLIENT_NONCE_TTL_SECS".to_owned())
            })?;
        }

        Ok(config)
    }
}

fn require_env(key: &'static str) -> Result<String, CoreError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Config(format!("missing {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_config_with_defaults() {
        let key = ApiKey::new("MyId", "Shush!").unwrap();
        let config = ClientConfig::new(key);
        assert_eq!(config.base_url, "https://api.stormpath.com/v1");
        assert_eq!(
            config.authentication_scheme,
            AuthenticationScheme::Sauthc1
        );
        assert_eq!(config.nonce_ttl_secs, 300);
    }

    #[test]
    fn test_should_parse_authentication_scheme() {
        assert_eq!(
            "sauthc1".parse::<AuthenticationScheme>().unwrap(),
            AuthenticationScheme::Sauthc1
        );
        assert_eq!(
            "BASIC".parse::<AuthenticationScheme>().unwrap(),
            AuthenticationScheme::Basic
        );
        assert!("digest".parse::<AuthenticationScheme>().is_err());
    }
}
