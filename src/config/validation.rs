//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::cache::MAX_TTL_SECONDS;
use crate::config::error::ConfigError;
use crate::config::settings::{
    CacheConfig, DatabaseConfig, FileSettings, LoggerSettings, MemoryCacheConfig,
    RedisCacheConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

const VALID_REDIS_SCHEMES: &[&str] = &["redis://", "rediss://", "unix://", "redis+unix://"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a non-empty PostgreSQL connection string
    /// - Min and max connections must be greater than 0, min <= max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !VALID_DATABASE_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl MemoryCacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.max_size == 0 {
            return Err(ConfigError::validation(
                "cache.memory.max_size",
                "Max size must be greater than 0 when the memory cache is enabled.",
            ));
        }
        Ok(())
    }
}

impl RedisCacheConfig {
    /// Only checked when the Redis backend is enabled.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if !VALID_REDIS_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::ValidationError {
                field: "cache.redis.url".to_string(),
                message: format!(
                    "Invalid Redis URL '{}'. Expected one of: {}",
                    self.url,
                    VALID_REDIS_SCHEMES.join(", ")
                ),
            });
        }

        if self.pool_size == 0 {
            return Err(ConfigError::validation(
                "cache.redis.pool_size",
                "Pool size must be greater than 0.",
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "cache.redis.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Validate cache configuration
    ///
    /// # Validation Rules
    /// - At least one backend must be enabled
    /// - `default_ttl_seconds`, when set, must be between 1 and `MAX_TTL_SECONDS`
    /// - Enabled backends must have usable settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.memory.enabled && !self.redis.enabled && !self.sql.enabled {
            return Err(ConfigError::validation(
                "cache",
                "At least one cache backend (memory, redis, sql) must be enabled.",
            ));
        }

        if self.default_ttl_seconds == Some(0) {
            return Err(ConfigError::validation(
                "cache.default_ttl_seconds",
                "Default TTL must be greater than 0 seconds. Leave it unset for entries that never expire.",
            ));
        }

        if self.default_ttl_seconds.is_some_and(|ttl| ttl > MAX_TTL_SECONDS) {
            return Err(ConfigError::validation(
                "cache.default_ttl_seconds",
                format!("Default TTL cannot exceed {MAX_TTL_SECONDS} seconds (100 years)."),
            ));
        }

        self.memory.validate()?;
        self.redis.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered. The `[database]`
    /// section is only checked when the SQL cache backend is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.cache.validate()?;
        if self.cache.sql.enabled {
            self.database.validate()?;
        }
        Ok(())
    }
}
