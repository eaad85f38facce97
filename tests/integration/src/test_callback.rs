//! Full SSO callback flow integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use stormpath_core::{FixedClock, InMemoryCache};
    use stormpath_jwt::JwtBuilder;
    use stormpath_sso::{
        AccountResultStatus, CacheNonceStore, IdSiteCallbackHandler, NonceStore, NonceStores,
        SamlCallbackHandler, SsoError, UpstreamErrorKind,
    };

    use crate::{callback_parts, fixture_api_key, fixture_instant};

    const KEY_SECRET: &str = "Shush!";

    fn handler() -> IdSiteCallbackHandler {
        IdSiteCallbackHandler::new(
            fixture_api_key(),
            Arc::new(FixedClock::new(fixture_instant())),
            NonceStores::in_memory(),
        )
    }

    fn result_token(response_id: &str, status: &str) -> String {
        JwtBuilder::new()
            .issuer("https://api.stormpath.com/v1")
            .audience("MyId")
            .subject("https://api.stormpath.com/v1/accounts/abc123")
            .expiration(fixture_instant() + chrono::Duration::seconds(60))
            .issued_at(fixture_instant())
            .claim("irt", json!(response_id))
            .claim("status", json!(status))
            .claim("isNewSub", json!(status == "REGISTERED"))
            .claim("state", json!("app-state"))
            .sign_with(KEY_SECRET.as_bytes())
            .unwrap()
    }

    fn error_token(code: u32) -> String {
        JwtBuilder::new()
            .header_param("kid", json!("MyId"))
            .issuer("https://api.stormpath.com/v1")
            .expiration(fixture_instant() + chrono::Duration::seconds(60))
            .claim(
                "err",
                json!({
                    "code": code,
                    "status": 401,
                    "message": "The flow failed.",
                    "developerMessage": "Restart the flow.",
                    "moreInfo": format!("https://docs.stormpath.com/errors/{code}"),
                }),
            )
            .sign_with(KEY_SECRET.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_should_run_full_flow_from_built_token_to_result() {
        let token = result_token("response-1", "AUTHENTICATED");
        let result = handler().get_account_result(&callback_parts(&token)).unwrap();

        assert_eq!(result.status(), AccountResultStatus::Authenticated);
        assert_eq!(
            result.account_href(),
            Some("https://api.stormpath.com/v1/accounts/abc123")
        );
        assert_eq!(result.state(), Some("app-state"));
        assert!(!result.is_new_account());
    }

    #[test]
    fn test_should_reject_second_use_of_same_token() {
        let handler = handler();
        let token = result_token("response-1", "AUTHENTICATED");

        assert!(handler.get_account_result(&callback_parts(&token)).is_ok());
        assert!(matches!(
            handler.get_account_result(&callback_parts(&token)),
            Err(SsoError::NonceAlreadyUsed)
        ));

        // A different response id is still accepted.
        let other = result_token("response-2", "AUTHENTICATED");
        assert!(handler.get_account_result(&callback_parts(&other)).is_ok());
    }

    #[tokio::test]
    async fn test_should_share_nonces_between_sync_and_async_paths() {
        let handler = handler();
        let token = result_token("response-1", "AUTHENTICATED");

        let first = handler
            .get_account_result_async(&callback_parts(&token))
            .await;
        assert!(first.is_ok());

        assert!(matches!(
            handler.get_account_result(&callback_parts(&token)),
            Err(SsoError::NonceAlreadyUsed)
        ));
    }

    #[test]
    fn test_should_accept_nonce_again_after_ttl_expiry() {
        let cache = Arc::new(InMemoryCache::new());
        let store: Arc<dyn NonceStore> =
            Arc::new(CacheNonceStore::new(cache, Duration::from_millis(10)));
        let handler = IdSiteCallbackHandler::new(
            fixture_api_key(),
            Arc::new(FixedClock::new(fixture_instant())),
            NonceStores::sync_only(store),
        );

        let token = result_token("response-1", "AUTHENTICATED");
        assert!(handler.get_account_result(&callback_parts(&token)).is_ok());

        std::thread::sleep(Duration::from_millis(25));
        assert!(handler.get_account_result(&callback_parts(&token)).is_ok());
    }

    #[test]
    fn test_should_map_upstream_error_codes_to_kinds() {
        let cases = [
            (12001, UpstreamErrorKind::SessionTimeout),
            (10012, UpstreamErrorKind::InvalidToken),
            (11002, UpstreamErrorKind::InvalidToken),
            (99999, UpstreamErrorKind::Runtime),
        ];

        for (code, expected) in cases {
            let result = handler().get_account_result(&callback_parts(&error_token(code)));
            match result {
                Err(SsoError::Upstream(err)) => {
                    assert_eq!(err.kind(), expected, "code {code}");
                    assert_eq!(err.code, code);
                    assert_eq!(err.status, 401);
                    assert!(err.more_info.contains(&code.to_string()));
                }
                other => panic!("expected upstream error for code {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_should_reject_result_token_with_foreign_audience_even_if_verifiable() {
        // Signed with the configured secret but naming another client: the
        // key-id check must fail before any signature check could pass it.
        let token = JwtBuilder::new()
            .issuer("https://api.stormpath.com/v1")
            .audience("OtherClient")
            .subject("https://api.stormpath.com/v1/accounts/abc123")
            .expiration(fixture_instant() + chrono::Duration::seconds(60))
            .claim("irt", json!("response-1"))
            .claim("status", json!("AUTHENTICATED"))
            .claim("isNewSub", json!(false))
            .sign_with(KEY_SECRET.as_bytes())
            .unwrap();

        let result = handler().get_account_result(&callback_parts(&token));
        assert!(matches!(result, Err(SsoError::ResponseSignedByForeignClient)));
    }

    #[test]
    fn test_should_handle_saml_callback_with_same_validation() {
        let handler = SamlCallbackHandler::new(
            fixture_api_key(),
            Arc::new(FixedClock::new(fixture_instant())),
            NonceStores::in_memory(),
        );

        let token = result_token("response-1", "LOGOUT");
        let result = handler.get_account_result(&callback_parts(&token)).unwrap();
        assert_eq!(result.status(), AccountResultStatus::Logout);

        assert!(matches!(
            handler.get_account_result(&callback_parts(&token)),
            Err(SsoError::NonceAlreadyUsed)
        ));
    }

    #[test]
    fn test_should_produce_registered_result_with_new_account_flag() {
        let token = result_token("response-1", "REGISTERED");
        let result = handler().get_account_result(&callback_parts(&token)).unwrap();
        assert_eq!(result.status(), AccountResultStatus::Registered);
        assert!(result.is_new_account());
    }
}
