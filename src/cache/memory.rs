//! Memory cache implementation using cached::ExpiringValueCache.

use std::fmt::Display;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use cached::Cached;
use cached::stores::ExpiringValueCache;

use crate::cache::entry::CacheEntry;
use crate::cache::key::resolve_key;
use crate::cache::{BackendKind, CacheError, CacheStore};
use crate::config::settings::MemoryCacheConfig;

type EntryStore<V> = ExpiringValueCache<String, CacheEntry<V>>;

/// In-process cache with a size limit and per-entry TTL.
///
/// Entries ask [`CacheEntry::is_expired`] whether they are still readable, so
/// the container drops expired entries on access.
pub struct MemoryStore<V> {
    store: Mutex<EntryStore<V>>,
}

impl<V> MemoryStore<V> {
    /// Builds a store sized by `cache.memory.max_size`; a size of 0 holds
    /// one entry.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self::with_capacity(NonZeroUsize::new(config.max_size).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn with_capacity(max_size: NonZeroUsize) -> Self {
        Self {
            store: Mutex::new(ExpiringValueCache::with_size(max_size.get())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, EntryStore<V>>, CacheError> {
        self.store
            .lock()
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MemoryStore<V>
where
    K: Display + Send + Sync + ?Sized,
    V: Clone + Send + Sync + 'static,
{
    async fn set(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<(), CacheError> {
        let key = resolve_key(key)?;
        let entry = CacheEntry::new(value, ttl);
        self.lock()?.cache_set(key.clone(), entry);
        tracing::debug!(backend = "memory", key = %key, ttl_ms = ?ttl.map(|t| t.as_millis()), "Cache set");
        Ok(())
    }

    async fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        let key = resolve_key(key)?;
        let value = self
            .lock()?
            .cache_get(&key)
            .map(|entry| entry.value.clone());
        tracing::debug!(backend = "memory", key = %key, hit = value.is_some(), "Cache get");
        Ok(value)
    }

    async fn remove(&self, key: &K) -> Result<bool, CacheError> {
        let key = resolve_key(key)?;
        let removed = self
            .lock()?
            .cache_remove(&key)
            .is_some_and(|entry| !entry.is_expired());
        tracing::debug!(backend = "memory", key = %key, removed, "Cache remove");
        Ok(removed)
    }

    async fn exists(&self, key: &K) -> Result<bool, CacheError> {
        let key = resolve_key(key)?;
        let exists = self.lock()?.cache_get(&key).is_some();

        tracing::debug!(backend = "memory", key = %key, exists, "Cache exists");
        Ok(exists)
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }
}
