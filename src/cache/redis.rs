//! Redis cache implementation using bb8 connection pool.

use std::fmt::Display;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::expiry::clamp_ttl;
use crate::cache::key::resolve_key;
use crate::cache::{BackendKind, CacheError, CacheStore};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

/// Redis-based cache with bb8 connection pool.
///
/// Values are stored as JSON strings. Expiry is delegated to Redis itself:
/// a TTL becomes a `PSETEX`, no TTL a plain `SET`.
pub struct RedisStore<V> {
    pool: RedisPool,
    key_prefix: String,
    _value: PhantomData<fn() -> V>,
}

impl<V> RedisStore<V> {
    pub async fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        Ok(Self::from_pool(pool, &config.key_prefix))
    }

    /// Wraps an existing pool. An empty prefix stores keys verbatim.
    pub fn from_pool(pool: RedisPool, key_prefix: &str) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.trim_end_matches(':').to_string(),
            _value: PhantomData,
        }
    }

    fn prefixed_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(backend = "redis", error = %e, "Failed to get Redis connection");
            CacheError::StoreUnavailable(e.to_string())
        })
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}:{key}")
    }
}

fn store_error(e: RedisError) -> CacheError {
    tracing::warn!(backend = "redis", error = %e, "Redis command failed");
    CacheError::StoreUnavailable(e.to_string())
}

/// Milliseconds for `PSETEX`, clamped to [`MAX_TTL`]. Redis rejects 0, so
/// sub-millisecond TTLs round up.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(clamp_ttl(ttl).as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

#[async_trait]
impl<K, V> CacheStore<K, V> for RedisStore<V>
where
    K: Display + Send + Sync + ?Sized,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<(), CacheError> {
        let prefixed = self.prefixed_key(&resolve_key(key)?);
        let payload = serde_json::to_string(&value)?;

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        match ttl {
            Some(ttl) => conn_ref
                .pset_ex::<_, _, ()>(&prefixed, payload, ttl_millis(ttl))
                .await
                .map_err(store_error)?,
            None => conn_ref
                .set::<_, _, ()>(&prefixed, payload)
                .await
                .map_err(store_error)?,
        }

        tracing::debug!(backend = "redis", key = %prefixed, ttl_ms = ?ttl.map(ttl_millis), "Cache set");
        Ok(())
    }

    async fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        let prefixed = self.prefixed_key(&resolve_key(key)?);

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let payload: Option<String> = conn_ref.get(&prefixed).await.map_err(store_error)?;

        tracing::debug!(backend = "redis", key = %prefixed, hit = payload.is_some(), "Cache get");
        payload
            .map(|payload| serde_json::from_str(&payload).map_err(CacheError::from))
            .transpose()
    }

    async fn remove(&self, key: &K) -> Result<bool, CacheError> {
        let prefixed = self.prefixed_key(&resolve_key(key)?);

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let deleted: usize = conn_ref.del(&prefixed).await.map_err(store_error)?;

        tracing::debug!(backend = "redis", key = %prefixed, removed = deleted > 0, "Cache remove");
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &K) -> Result<bool, CacheError> {
        let prefixed = self.prefixed_key(&resolve_key(key)?);

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let exists: bool = conn_ref.exists(&prefixed).await.map_err(store_error)?;

        tracing::debug!(backend = "redis", key = %prefixed, exists, "Cache exists");
        Ok(exists)
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Redis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MAX_TTL_SECONDS;
    use serde_json::{Value, json};

    #[test]
    fn test_ttl_millis_rounds_up_to_one() {
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::from_millis(300)), 300);
        assert_eq!(ttl_millis(Duration::from_secs(2)), 2000);
    }

    #[test]
    fn test_ttl_millis_clamps_to_max_ttl() {
        let max_millis = MAX_TTL_SECONDS * 1000;
        assert_eq!(ttl_millis(Duration::from_secs(u64::MAX)), max_millis);
        assert_eq!(ttl_millis(Duration::MAX), max_millis);
        assert!(max_millis < i64::MAX as u64 / 2);
    }

    async fn create_store(prefix: &str) -> RedisStore<Value> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let config = RedisCacheConfig {
            url,
            key_prefix: prefix.to_string(),
            ..RedisCacheConfig::default()
        };
        RedisStore::new(&config).await.expect("Redis should be reachable")
    }

    fn unique_key() -> String {
        format!("test:{}", uuid::Uuid::new_v4())
    }

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("omnicache", "a:b"), "omnicache:a:b");
        assert_eq!(prefixed_key("", "a:b"), "a:b");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_set_and_get_returns_same_value() {
        let store = create_store("").await;
        let key = unique_key();
        let value = json!({"name": "redis", "count": 10});

        store.set(key.as_str(), value.clone(), None).await.unwrap();

        assert_eq!(store.get(key.as_str()).await.unwrap(), Some(value));
        assert!(store.exists(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_remove_deletes_value() {
        let store = create_store("").await;
        let key = unique_key();
        store.set(key.as_str(), json!({}), None).await.unwrap();

        assert!(store.remove(key.as_str()).await.unwrap());
        assert_eq!(store.get(key.as_str()).await.unwrap(), None);
        assert!(!store.remove(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_expired_key_is_not_available() {
        let store = create_store("").await;
        let key = unique_key();
        store
            .set(key.as_str(), json!({}), Some(Duration::from_millis(300)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.get(key.as_str()).await.unwrap(), None);
        assert!(!store.exists(key.as_str()).await.unwrap());
        assert!(!store.remove(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_corrupt_value_is_serialization_error() {
        let store = create_store("").await;
        let key = unique_key();
        {
            let mut conn = store.get_conn().await.unwrap();
            let conn_ref: &mut MultiplexedConnection = &mut conn;
            conn_ref.set::<_, _, ()>(&key, "{not json").await.unwrap();
        }

        assert!(matches!(
            store.get(key.as_str()).await,
            Err(CacheError::Serialization(_))
        ));
    }
}
