//! Cache manager bound to one backend.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{BackendKind, CacheError, CacheStore, StoreResolver};

/// Facade over a single store chosen at construction.
///
/// Every operation is a pure delegation: no retries, no fallback, no
/// key rewriting.
pub struct CacheManager<K: ?Sized, V> {
    store: Arc<dyn CacheStore<K, V>>,
}

impl<K: ?Sized, V> CacheManager<K, V> {
    pub fn new(store: Arc<dyn CacheStore<K, V>>) -> Self {
        Self { store }
    }

    /// Binds the manager to the store registered under `name`.
    pub fn from_resolver(resolver: &StoreResolver<K, V>, name: &str) -> Result<Self, CacheError> {
        resolver.resolve(name).map(Self::new)
    }

    /// Get a reference to the cache backend.
    pub fn store(&self) -> &Arc<dyn CacheStore<K, V>> {
        &self.store
    }

    pub fn backend(&self) -> BackendKind {
        self.store.backend()
    }

    // ========================================================================
    // CacheStore proxy methods
    // ========================================================================

    /// Set a value in the cache.
    pub async fn set(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.store.set(key, value, ttl).await
    }

    /// Get a value from the cache.
    pub async fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        self.store.get(key).await
    }

    /// Remove a value from the cache.
    pub async fn remove(&self, key: &K) -> Result<bool, CacheError> {
        self.store.remove(key).await
    }

    pub async fn exists(&self, key: &K) -> Result<bool, CacheError> {
        self.store.exists(key).await
    }
}

impl<K: ?Sized, V> Clone for CacheManager<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
