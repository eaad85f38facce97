//! Nonce stores for replay protection.
//!
//! A nonce is the single-use response id carried by a callback token. The
//! store records consumed nonces: absence means "not yet used", presence
//! means "already used, reject". Entries are never deleted explicitly; the
//! backing cache's TTL evicts them once no still-valid token could carry
//! them.
//!
//! The store deliberately exposes separate `contains`/`put` operations
//! rather than an atomic check-and-set: the callback handler performs the
//! two calls in sequence, preserving the protocol's documented (narrow)
//! replay window under concurrent identical tokens.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stormpath_core::{AsyncCache, Cache, CacheError, InMemoryCache};

/// Default TTL for recorded nonces.
///
/// Callback tokens are valid for at most 60 seconds; recorded nonces must
/// outlive any token that could still be replayed, with margin for clock
/// skew.
pub const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(300);

/// A synchronous store of consumed nonces.
pub trait NonceStore: fmt::Debug + Send + Sync {
    /// Whether `nonce` has already been recorded.
    fn contains_nonce(&self, nonce: &str) -> Result<bool, CacheError>;

    /// Record `nonce` as consumed.
    fn put_nonce(&self, nonce: &str) -> Result<(), CacheError>;
}

/// The asynchronous twin of [`NonceStore`].
#[async_trait]
pub trait AsyncNonceStore: fmt::Debug + Send + Sync {
    /// Whether `nonce` has already been recorded.
    async fn contains_nonce(&self, nonce: &str) -> Result<bool, CacheError>;

    /// Record `nonce` as consumed.
    async fn put_nonce(&self, nonce: &str) -> Result<(), CacheError>;
}

/// Cache-backed nonce store.
///
/// Keys are prefixed to give nonces their own cache region; values are
/// empty, only presence matters. Implements [`NonceStore`] when the cache is
/// synchronous and [`AsyncNonceStore`] when it is asynchronous;
/// [`InMemoryCache`] provides both.
#[derive(Debug)]
pub struct CacheNonceStore<C> {
    cache: Arc<C>,
    prefix: String,
    ttl: Duration,
}

impl CacheNonceStore<InMemoryCache> {
    /// Build an in-memory store with the default TTL.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCache::new()), DEFAULT_NONCE_TTL)
    }
}

impl<C> CacheNonceStore<C> {
    /// Build a store over `cache` with the given nonce TTL.
    #[must_use]
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            prefix: "sso:nonce".to_owned(),
            ttl,
        }
    }

    fn key(&self, nonce: &str) -> String {
        format!("{}:{nonce}", self.prefix)
    }
}

impl<C: Cache + fmt::Debug> NonceStore for CacheNonceStore<C> {
    fn contains_nonce(&self, nonce: &str) -> Result<bool, CacheError> {
        Ok(self.cache.get(&self.key(nonce))?.is_some())
    }

    fn put_nonce(&self, nonce: &str) -> Result<(), CacheError> {
        self.cache.put(&self.key(nonce), "", Some(self.ttl))
    }
}

#[async_trait]
impl<C: AsyncCache + fmt::Debug> AsyncNonceStore for CacheNonceStore<C> {
    async fn contains_nonce(&self, nonce: &str) -> Result<bool, CacheError> {
        Ok(self.cache.get(&self.key(nonce)).await?.is_some())
    }

    async fn put_nonce(&self, nonce: &str) -> Result<(), CacheError> {
        self.cache.put(&self.key(nonce), "", Some(self.ttl)).await
    }
}

/// The nonce-store wiring for a callback handler.
///
/// A handler supports the execution modes its stores support; invoking the
/// other mode fails with a clear error instead of silently degrading.
#[derive(Clone, Default)]
pub struct NonceStores {
    sync: Option<Arc<dyn NonceStore>>,
    asynchronous: Option<Arc<dyn AsyncNonceStore>>,
}

impl NonceStores {
    /// Wire an in-memory store into both execution modes.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_ttl(DEFAULT_NONCE_TTL)
    }

    /// Wire an in-memory store with a custom nonce TTL into both execution
    /// modes.
    #[must_use]
    pub fn in_memory_with_ttl(ttl: Duration) -> Self {
        let store = Arc::new(CacheNonceStore::new(Arc::new(InMemoryCache::new()), ttl));
        Self {
            sync: Some(store.clone()),
            asynchronous: Some(store),
        }
    }

    /// Wire a synchronous store only.
    #[must_use]
    pub fn sync_only(store: Arc<dyn NonceStore>) -> Self {
        Self {
            sync: Some(store),
            asynchronous: None,
        }
    }

    /// Wire an asynchronous store only.
    #[must_use]
    pub fn async_only(store: Arc<dyn AsyncNonceStore>) -> Self {
        Self {
            sync: None,
            asynchronous: Some(store),
        }
    }

    /// Wire both execution modes.
    #[must_use]
    pub fn both(sync: Arc<dyn NonceStore>, asynchronous: Arc<dyn AsyncNonceStore>) -> Self {
        Self {
            sync: Some(sync),
            asynchronous: Some(asynchronous),
        }
    }

    pub(crate) fn require_sync(&self) -> Result<&dyn NonceStore, crate::SsoError> {
        self.sync
            .as_deref()
            .ok_or(crate::SsoError::UnsupportedExecutionMode("synchronous"))
    }

    pub(crate) fn require_async(&self) -> Result<&dyn AsyncNonceStore, crate::SsoError> {
        self.asynchronous
            .as_deref()
            .ok_or(crate::SsoError::UnsupportedExecutionMode("asynchronous"))
    }
}

impl fmt::Debug for NonceStores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceStores")
            .field("sync", &self.sync.is_some())
            .field("asynchronous", &self.asynchronous.is_some())
            .finish()
    }
}
