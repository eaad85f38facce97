//! Cache abstractions backing the SSO nonce store.
//!
//! The interface is intentionally small and string-based: nonce bookkeeping
//! only needs `get`/`put`-with-TTL/`remove`. Both a synchronous and an
//! asynchronous variant exist because callback handling supports both
//! execution modes; [`InMemoryCache`] implements both over the same map.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors.
///
/// Kept independent from [`crate::CoreError`] so callers decide how to fail:
/// the nonce store treats any backend error as an authentication failure
/// (fail closed).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached.
    #[error("cache connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed the operation.
    #[error("cache command error: {0}")]
    Command(String),
}

/// A minimal synchronous cache interface.
///
/// Entries expire after their TTL; an expired entry behaves exactly like an
/// absent one. Implementations must support concurrent access from multiple
/// threads without external locking.
pub trait Cache: Send + Sync {
    /// Get the value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`. `ttl` of `None` means the entry never
    /// expires.
    fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove the entry under `key`, returning its value if it was present.
    fn remove(&self, key: &str) -> CacheResult<Option<String>>;
}

/// The asynchronous twin of [`Cache`].
#[async_trait]
pub trait AsyncCache: Send + Sync {
    /// Get the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`. `ttl` of `None` means the entry never
    /// expires.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove the entry under `key`, returning its value if it was present.
    async fn remove(&self, key: &str) -> CacheResult<Option<String>>;
}

/// Thread-safe in-memory cache with per-entry TTL.
///
/// Uses `DashMap` for lock-free concurrent access. Expired entries are
/// dropped lazily when read; there is no background sweeper, which is fine
/// for the nonce-store workload where every key is eventually read or
/// overwritten within its TTL window.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stormpath_core::{Cache, InMemoryCache};
///
/// let cache = InMemoryCache::new();
/// cache.put("k", "v", Some(Duration::from_secs(60))).unwrap();
/// assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    inner: DashMap<String, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

impl InMemoryCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Number of live (non-expired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// Whether the cache holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_live(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        // Read and release the shard guard before any removal; removing
        // while the guard is held would deadlock the shard.
        let state = self.inner.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        });
        match state {
            Some(Some(value)) => Some(value),
            Some(None) => {
                self.inner.remove(key);
                None
            }
            None => None,
        }
    }
}

impl Cache for InMemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.get_live(key))
    }

    fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_owned(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.inner.insert(key.to_owned(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .inner
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value))
    }
}

#[async_trait]
impl AsyncCache for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Cache::get(self, key)
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        Cache::put(self, key, value, ttl)
    }

    async fn remove(&self, key: &str) -> CacheResult<Option<String>> {
        Cache::remove(self, key)
    }
}
