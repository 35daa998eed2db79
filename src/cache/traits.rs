//! CacheStore trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{BackendKind, CacheError};

/// Trait for cache operations.
///
/// All cache backends implement this trait so callers observe the same
/// behavior whichever backend is selected:
///
/// - keys are validated once per call before the store is touched;
/// - a missing, removed and expired key are indistinguishable;
/// - an entry written with a TTL is unreadable once the TTL has elapsed;
/// - an entry written without a TTL persists until removed.
#[async_trait]
pub trait CacheStore<K: ?Sized, V>: Send + Sync {
    /// Store a value, replacing any existing entry for the key.
    async fn set(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Get a live value from the cache.
    async fn get(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Remove a value. Returns `true` only if a live entry was deleted.
    async fn remove(&self, key: &K) -> Result<bool, CacheError>;

    /// Check whether a live entry exists.
    async fn exists(&self, key: &K) -> Result<bool, CacheError>;

    /// The backend variant behind this store.
    fn backend(&self) -> BackendKind;
}
