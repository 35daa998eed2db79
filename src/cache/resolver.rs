//! Backend selection by name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cache::{CacheError, CacheStore};

/// The cache backends this crate provides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Sql,
    Redis,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Memory, BackendKind::Sql, BackendKind::Redis];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Sql => "sql",
            BackendKind::Redis => "redis",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = CacheError;

    /// Case-insensitive: `"Redis"`, `"REDIS"` and `"redis"` are the same backend.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "sql" => Ok(BackendKind::Sql),
            "redis" => Ok(BackendKind::Redis),
            _ => Err(CacheError::UnknownBackend(s.to_string())),
        }
    }
}

/// Registry of the stores available at runtime, looked up by backend name.
///
/// Resolution never retries and never falls back to another backend.
pub struct StoreResolver<K: ?Sized, V> {
    stores: BTreeMap<BackendKind, Arc<dyn CacheStore<K, V>>>,
}

impl<K: ?Sized, V> StoreResolver<K, V> {
    pub fn new() -> Self {
        Self {
            stores: BTreeMap::new(),
        }
    }

    /// Registers a store under its own [`CacheStore::backend`], returning the
    /// store it replaced, if any.
    pub fn register(
        &mut self,
        store: Arc<dyn CacheStore<K, V>>,
    ) -> Option<Arc<dyn CacheStore<K, V>>> {
        let kind = store.backend();
        tracing::debug!(backend = %kind, "Registered cache store");
        self.stores.insert(kind, store)
    }

    pub fn with_store(mut self, store: Arc<dyn CacheStore<K, V>>) -> Self {
        self.register(store);
        self
    }

    /// Looks a store up by name.
    ///
    /// # Errors
    /// - `UnknownBackend` if `name` is not a backend this crate knows
    /// - `StoreUnavailable` if the backend is known but was not registered
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn CacheStore<K, V>>, CacheError> {
        self.resolve_kind(name.parse()?)
    }

    pub fn resolve_kind(&self, kind: BackendKind) -> Result<Arc<dyn CacheStore<K, V>>, CacheError> {
        self.stores.get(&kind).cloned().ok_or_else(|| {
            CacheError::StoreUnavailable(format!("{} backend is not enabled", kind))
        })
    }

    /// Registered backends, in declaration order.
    pub fn backends(&self) -> Vec<BackendKind> {
        self.stores.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl<K: ?Sized, V> Default for StoreResolver<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized, V> Clone for StoreResolver<K, V> {
    fn clone(&self) -> Self {
        Self {
            stores: self.stores.clone(),
        }
    }
}
