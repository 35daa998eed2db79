use axum::extract::rejection::{JsonRejection, QueryRejection};
use thiserror::Error;
use validator::ValidationErrors;

use crate::cache::CacheError;
use crate::config::error::ConfigError;

/// Application-wide error type.
///
/// Cache failures keep their own [`CacheError`] so the HTTP layer can map
/// each kind to a status code without inspecting messages.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Cache operation failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// A cache key that was well-formed but had no live entry.
    pub fn cache_miss(backend: &str, key: &str) -> Self {
        AppError::NotFound {
            entity: format!("{} cache entry", backend.to_lowercase()),
            field: "key".to_string(),
            value: key.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            ConfigError::FileNotFound(path) => path.clone(),
            ConfigError::EnvVarError(_) | ConfigError::MutualExclusivityError(_) => {
                "environment".to_string()
            }
            ConfigError::ParseError(_) | ConfigError::Other(_) => "configuration".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<ValidationErrors> for AppError {
    /// Reports the first failing field; fields are visited in name order.
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, field_errors)) = fields.into_iter().next() else {
            return AppError::BadRequest {
                message: errors.to_string(),
            };
        };
        let reason = field_errors
            .first()
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "invalid value".to_string());

        AppError::Validation {
            field: field.to_string(),
            reason,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
