//! Cache error types.

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// "Not found" and "expired" are not errors: both surface as `Ok(None)` /
/// `Ok(false)` from the store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Unknown cache backend: {0}")]
    UnknownBackend(String),

    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::Serialization(error.to_string())
    }
}
