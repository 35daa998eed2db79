//! Health check DTOs for API responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response structure.
///
/// `checks` holds one entry per registered cache backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2025-01-01T12:00:00Z",
    "checks": {
        "memory": {
            "status": "healthy",
            "message": "Reachable",
            "response_time_ms": 0
        }
    }
}))]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    /// Timestamp of the health check (RFC 3339)
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Backend name to check result
    pub checks: BTreeMap<String, ComponentHealth>,
}

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Some backends failing, at least one still usable
    Degraded,
    /// No backend usable
    Unhealthy,
}

impl HealthStatus {
    /// Overall status from per-backend results.
    pub fn aggregate<'a>(statuses: impl IntoIterator<Item = &'a HealthStatus>) -> Self {
        let (mut healthy, mut failing) = (0usize, 0usize);
        for status in statuses {
            match status {
                HealthStatus::Healthy => healthy += 1,
                _ => failing += 1,
            }
        }
        match (healthy, failing) {
            (_, 0) if healthy > 0 => HealthStatus::Healthy,
            (0, _) => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        }
    }
}

/// Individual component health information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// Component status
    pub status: HealthStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}
