//! Key-value caching over interchangeable backends.
//!
//! Three stores implement [`CacheStore`]:
//! - [`MemoryStore`]: in-process, size-bounded, expiry checked on access
//! - [`RedisStore`]: distributed, expiry delegated to Redis (`PSETEX`)
//! - [`SqlStore`]: PostgreSQL table with an `"ExpiresOn"` column filtered on read
//!
//! Whichever store is used, an expired entry behaves exactly like one that was
//! never written, and `expires_on == now` counts as expired.
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! # default_ttl_seconds = 600
//!
//! [cache.memory]
//! enabled = true
//! max_size = 10000
//!
//! [cache.redis]
//! enabled = false
//! url = "redis://127.0.0.1:6379"
//! pool_size = 4
//! connection_timeout = 5
//! key_prefix = ""
//!
//! [cache.sql]
//! enabled = false
//! snapshot_reads = true
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let resolver = StoreResolver::new()
//!     .with_store(Arc::new(MemoryStore::<Value>::new(&settings.cache.memory)));
//! let cache = CacheManager::from_resolver(&resolver, "memory")?;
//!
//! let key = cache_key!("user", user_id, "profile");
//! cache.set(&key, profile, Some(Duration::from_secs(60))).await?;
//! ```

mod entry;
mod error;
mod expiry;
mod key;
mod manager;
mod memory;
mod redis;
mod resolver;
mod sql;
mod traits;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use expiry::{
    MAX_TTL, MAX_TTL_SECONDS, clamp_ttl, compute_expiry, compute_expiry_at, is_expired,
    is_expired_at,
};
pub use key::{KEY_SEPARATOR, MAX_KEY_LENGTH, format_key, validate_key};
pub use manager::CacheManager;
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use resolver::{BackendKind, StoreResolver};
pub use sql::{ReadIsolation, SqlStore};
pub use traits::CacheStore;

// Re-export config types
pub use crate::config::settings::{
    CacheConfig, MemoryCacheConfig, RedisCacheConfig, SqlCacheConfig,
};
