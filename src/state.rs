//! Application state for Axum web framework.
//!
//! Contains the shared cache stores that are accessible across all request
//! handlers.

use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheManager, CacheError, StoreResolver};

/// Store resolver keyed by plain string keys and holding arbitrary JSON
pub type JsonStoreResolver = StoreResolver<str, Value>;

/// Application state shared by all handlers.
///
/// Cloning is cheap: the resolver only holds `Arc`s to the stores.
#[derive(Clone)]
pub struct AppState {
    /// Every enabled cache backend, addressed by name
    pub resolver: JsonStoreResolver,
    /// TTL applied to writes that do not pass `ttl_seconds`
    pub default_ttl: Option<Duration>,
    /// Requests running longer are answered with 408
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(resolver: JsonStoreResolver, default_ttl: Option<Duration>) -> Self {
        Self {
            resolver,
            default_ttl,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Cache facade bound to the backend named in the request path
    pub fn cache(&self, backend: &str) -> Result<CacheManager<str, Value>, CacheError> {
        CacheManager::from_resolver(&self.resolver, backend)
    }
}
