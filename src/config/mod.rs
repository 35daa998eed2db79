//! Configuration management module for omnicache
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `OMNICACHE_*` environment variables, `__` separating nested keys
//!    (`OMNICACHE_CACHE__REDIS__URL` sets `cache.redis.url`)

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    CacheConfig, DatabaseConfig, LoggerSettings, MemoryCacheConfig, RedisCacheConfig,
    ServerConfig, Settings, SqlCacheConfig,
};
