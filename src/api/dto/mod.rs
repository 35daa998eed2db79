//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `cache` - cache entry request parameters
//! - `error` - Common error response DTOs
//! - `health` - health check responses

mod cache;
mod error;
mod health;

pub use cache::{CacheEntryPath, CacheValue, SetEntryQuery};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
