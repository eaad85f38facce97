//! Outgoing request model and the [`RequestAuthenticator`] strategy trait.

use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, Method, Uri};
use stormpath_core::{ApiKey, AuthenticationScheme, Clock};

use crate::basic::BasicRequestAuthenticator;
use crate::error::AuthcResult;
use crate::sauthc1::Sauthc1RequestAuthenticator;

/// A mutable outgoing HTTP request.
///
/// Authenticators mutate the request in place: they add the headers the
/// protocol requires and set the `Authorization` header. The transport layer
/// (out of scope here) sends the result as-is; changing any signed component
/// afterwards invalidates the signature.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Request {
    /// Create a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Replace the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The request body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// A strategy that authenticates an outgoing request by mutating it.
///
/// Implementations are stateless per invocation and safe to share across
/// threads; the same authenticator instance serves every request the client
/// sends.
pub trait RequestAuthenticator: fmt::Debug + Send + Sync {
    /// Add the headers required to authenticate `request` with `api_key`.
    fn authenticate(&self, request: &mut Request, api_key: &ApiKey) -> AuthcResult<()>;
}

/// Build the request authenticator for the configured scheme.
#[must_use]
pub fn authenticator_for(
    scheme: AuthenticationScheme,
    clock: Arc<dyn Clock>,
) -> Box<dyn RequestAuthenticator> {
    match scheme {
        AuthenticationScheme::Sauthc1 => Box::new(Sauthc1RequestAuthenticator::new(clock)),
        AuthenticationScheme::Basic => Box::new(BasicRequestAuthenticator::new(clock)),
    }
}
