//! Health check endpoint handlers.
//!
//! Each registered cache backend is checked with an `exists` call on a
//! reserved key, which exercises the same connection path as real traffic.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::cache::{BackendKind, format_key};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Per-backend health report
/// - `GET /health/ready` - Readiness check
/// - `GET /health/live` - Liveness check
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Basic health check endpoint.
///
/// Healthy when every backend answers, degraded when only some do.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All or some backends reachable", body = HealthResponse),
        (status = 503, description = "No backend reachable", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let checks = check_backends(&state).await;
    let status = HealthStatus::aggregate(checks.values().map(|c| &c.status));

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    };

    let code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

/// Readiness check endpoint.
///
/// Ready only when every registered backend answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let checks = check_backends(&state).await;

    match HealthStatus::aggregate(checks.values().map(|c| &c.status)) {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness check endpoint.
///
/// Does not touch any backend.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_backends(state: &AppState) -> BTreeMap<String, ComponentHealth> {
    let check_key = format_key(["omnicache", "health", "check"]);
    let mut checks = BTreeMap::new();

    for kind in state.resolver.backends() {
        checks.insert(kind.to_string(), check_backend(state, kind, &check_key).await);
    }
    checks
}

async fn check_backend(state: &AppState, kind: BackendKind, check_key: &str) -> ComponentHealth {
    let start_time = Instant::now();
    let result = match state.resolver.resolve_kind(kind) {
        Ok(store) => store.exists(check_key).await,
        Err(e) => Err(e),
    };
    let response_time_ms = Some(u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX));

    match result {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Reachable".to_string()),
            response_time_ms,
        },
        Err(e) => {
            tracing::warn!(backend = %kind, error = %e, "Health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms,
            }
        }
    }
}
