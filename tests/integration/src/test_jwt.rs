//! JWT round-trip and tamper-sensitivity integration tests.

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use stormpath_jwt::{JwtBuilder, JwtError, JwtParser, validate_lifetime, validate_signature};

    use crate::fixture_instant;

    const KEY: &[u8] = b"Shush!";

    fn token() -> String {
        JwtBuilder::new()
            .issuer("https://api.stormpath.com/v1")
            .subject("https://api.stormpath.com/v1/accounts/abc123")
            .audience("MyId")
            .id("token-1")
            .expiration(fixture_instant() + Duration::seconds(60))
            .issued_at(fixture_instant())
            .claim("custom", json!({"nested": [1, 2, 3]}))
            .sign_with(KEY)
            .unwrap()
    }

    #[test]
    fn test_should_round_trip_claims_through_build_and_parse() {
        let parsed = JwtParser::new()
            .signing_key(KEY)
            .require_issuer("https://api.stormpath.com/v1")
            .require_audience("MyId")
            .parse(&token())
            .unwrap();

        assert_eq!(parsed.claims().id(), Some("token-1"));
        assert_eq!(
            parsed.claims().expiration(),
            Some(fixture_instant() + Duration::seconds(60))
        );
        assert_eq!(parsed.claims().get("custom"), Some(&json!({"nested": [1, 2, 3]})));
    }

    #[test]
    fn test_should_fail_signature_validation_after_any_single_character_flip() {
        let token = token();
        let parser = JwtParser::new().signing_key(KEY);

        for index in 0..token.len() {
            let original = token.as_bytes()[index] as char;
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            if original == replacement {
                continue;
            }

            let mut tampered: Vec<char> = token.chars().collect();
            tampered[index] = replacement;
            let tampered: String = tampered.into_iter().collect();

            assert!(
                parser.parse(&tampered).is_err(),
                "flip at byte {index} was accepted"
            );
        }
    }

    #[test]
    fn test_should_validate_signature_in_two_passes() {
        // Parse without a key, inspect, then validate explicitly, as the
        // callback handlers do once they know which key applies.
        let token = token();
        let parsed = JwtParser::new().parse(&token).unwrap();

        assert_eq!(parsed.claims().audience(), Some("MyId"));
        assert!(
            validate_signature(
                parsed.base64_header(),
                parsed.base64_payload(),
                parsed.base64_signature(),
                KEY,
            )
            .is_ok()
        );
        assert!(matches!(
            validate_signature(
                parsed.base64_header(),
                parsed.base64_payload(),
                parsed.base64_signature(),
                b"wrong-key",
            ),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_should_distinguish_future_issuance_from_expiry() {
        let parsed = JwtParser::new().parse(&token()).unwrap();

        // Before issuance: iat is in the future, but exp has not passed.
        let early = fixture_instant() - Duration::seconds(30);
        assert!(matches!(
            validate_lifetime(parsed.claims(), early),
            Err(JwtError::IssuedInFuture { .. })
        ));

        // After expiry.
        let late = fixture_instant() + Duration::seconds(120);
        assert!(matches!(
            validate_lifetime(parsed.claims(), late),
            Err(JwtError::Expired { .. })
        ));

        // In the window.
        assert!(validate_lifetime(parsed.claims(), fixture_instant() + Duration::seconds(30)).is_ok());
    }
}
