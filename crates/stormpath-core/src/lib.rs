//! Core types, configuration, and shared abstractions for the Stormpath client.
//!
//! This crate provides the foundational building blocks shared across the
//! Stormpath client workspace: API key material, the injectable [`Clock`]
//! used everywhere "now" is needed, the [`Cache`]/[`AsyncCache`] abstractions
//! backing the SSO nonce store, and environment-driven client configuration.

mod cache;
mod clock;
mod config;
mod error;
mod types;

pub use cache::{AsyncCache, Cache, CacheError, CacheResult, InMemoryCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AuthenticationScheme, ClientConfig};
pub use error::{CoreError, CoreResult};
pub use types::ApiKey;
