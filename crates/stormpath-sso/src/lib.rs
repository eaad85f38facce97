//! ID-Site and SAML SSO callback validation with replay protection.
//!
//! An SSO flow ends with the identity service redirecting the user's browser
//! back to the application, carrying a signed JWT that asserts the outcome
//! (authenticated, registered, or logged out). This crate validates that
//! callback end to end: token structure, signature, lifetime, required
//! claims, and single-use response nonce, then produces an immutable
//! [`AccountResult`] and dispatches it to an optional listener.
//!
//! # Overview
//!
//! The validation pipeline is a fixed-order state machine shared by the
//! [`IdSiteCallbackHandler`] and [`SamlCallbackHandler`] fronts; a failure
//! at any step short-circuits with a specific [`SsoError`]. Replay
//! protection records each consumed response id in a [`NonceStore`] backed
//! by a TTL cache.
//!
//! # Modules
//!
//! - [`callback`] - The shared validation state machine
//! - [`error`] - SSO error types, including upstream error payloads
//! - [`idsite`] - ID-Site callback handler and listener
//! - [`nonce`] - Nonce stores (sync and async) for replay protection
//! - [`result`] - The immutable account result model
//! - [`saml`] - SAML callback handler and listener

pub mod callback;
pub mod error;
pub mod idsite;
pub mod nonce;
pub mod result;
pub mod saml;

pub use callback::JWT_RESPONSE_PARAM;
pub use error::{SsoError, SsoResult, UpstreamError, UpstreamErrorKind};
pub use idsite::{IdSiteCallbackHandler, IdSiteResultListener};
pub use nonce::{AsyncNonceStore, CacheNonceStore, DEFAULT_NONCE_TTL, NonceStore, NonceStores};
pub use result::{AccountResult, AccountResultStatus};
pub use saml::{SamlCallbackHandler, SamlResultListener};
