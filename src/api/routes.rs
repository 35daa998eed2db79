//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::http::{StatusCode, Uri};
use axum::{Router, middleware, response::Redirect, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::error::AppError;
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates the application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. CORS and compression
/// 2. Request ID: generates or propagates `x-request-id`
/// 3. Logging: one span per request carrying the request ID
/// 4. Error handler: JSON error bodies stamped with the request ID
/// 5. Timeout: 408 once `state.request_timeout` elapses, dropping the handler
///
/// # Routes
/// - `/cache/{backend}/{key}` - cache entry operations
/// - `/health`, `/health/live`, `/health/ready`
/// - `/swagger-ui` and `/api-docs/openapi.json`; `/` redirects to the UI
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::cache::cache_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let router = router
        .route("/", get(|| async { Redirect::temporary(SWAGGER_UI_PATH) }))
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi))
        .fallback(route_not_found);

    let router = match state.request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        )),
        None => router,
    };

    router
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        entity: "route".to_string(),
        field: "path".to_string(),
        value: uri.path().to_string(),
    }
}
