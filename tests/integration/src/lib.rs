//! Integration tests for the Stormpath client workspace.
//!
//! These exercise the crates together, in process: signing outbound requests
//! against the reference fixtures, building and validating callback tokens,
//! and running the full SSO callback flow including replay protection.

use std::sync::Once;

use chrono::{DateTime, Utc};
use stormpath_core::ApiKey;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The API key the reference fixtures were produced with.
#[must_use]
pub fn fixture_api_key() -> ApiKey {
    init_tracing();
    ApiKey::new("MyId", "Shush!").expect("fixture key is valid")
}

/// The instant the reference fixtures were produced at.
#[must_use]
pub fn fixture_instant() -> DateTime<Utc> {
    "2013-07-01T00:00:00Z".parse().expect("fixture instant parses")
}

/// The nonce the reference fixtures were produced with.
pub const FIXTURE_NONCE: &str = "a43a9d25-ab06-421e-8605-33fd1e760825";

/// Build callback request parts for a token delivered via `jwtResponse`.
#[must_use]
pub fn callback_parts(token: &str) -> http::request::Parts {
    let (parts, ()) = http::Request::builder()
        .method("GET")
        .uri(format!("https://myapp.com/sso/callback?jwtResponse={token}"))
        .body(())
        .expect("callback request builds")
        .into_parts();
    parts
}

mod test_callback;
mod test_client;
mod test_jwt;
mod test_signing;
