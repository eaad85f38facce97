//! Wiring tests: configuration driving authenticator and handler setup.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use http::{Method, Uri};
    use serde_json::json;
    use stormpath_auth::{Request, authenticator_for};
    use stormpath_core::{AuthenticationScheme, ClientConfig, FixedClock};
    use stormpath_jwt::JwtBuilder;
    use stormpath_sso::{AccountResultStatus, IdSiteCallbackHandler, NonceStores};

    use crate::{callback_parts, fixture_api_key, fixture_instant};

    #[test]
    fn test_should_wire_authenticator_from_config() {
        let config = ClientConfig::new(fixture_api_key());
        assert_eq!(config.authentication_scheme, AuthenticationScheme::Sauthc1);

        let clock = Arc::new(FixedClock::new(fixture_instant()));
        let authenticator = authenticator_for(config.authentication_scheme, clock);

        let mut request = Request::new(
            Method::GET,
            Uri::from_static("https://api.stormpath.com/v1/tenants/current"),
        );
        authenticator
            .authenticate(&mut request, &config.api_key)
            .unwrap();

        let authorization = request
            .headers()
            .get(http::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(authorization.starts_with("SAuthc1 sauthc1Id=MyId/"));
        assert!(request.headers().contains_key("x-stormpath-date"));
        assert!(request.headers().contains_key("host"));
    }

    #[test]
    fn test_should_wire_callback_handler_from_config() {
        let config = ClientConfig::new(fixture_api_key());
        let handler = IdSiteCallbackHandler::new(
            config.api_key.clone(),
            Arc::new(FixedClock::new(fixture_instant())),
            NonceStores::in_memory_with_ttl(Duration::from_secs(config.nonce_ttl_secs)),
        );

        let token = JwtBuilder::new()
            .issuer(config.base_url.as_str())
            .audience("MyId")
            .subject("https://api.stormpath.com/v1/accounts/abc123")
            .expiration(fixture_instant() + chrono::Duration::seconds(60))
            .claim("irt", json!("response-1"))
            .claim("status", json!("AUTHENTICATED"))
            .claim("isNewSub", json!(false))
            .sign_with("Shush!".as_bytes())
            .unwrap();

        let result = handler.get_account_result(&callback_parts(&token)).unwrap();
        assert_eq!(result.status(), AccountResultStatus::Authenticated);
    }
}
