//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders as a JSON [`ErrorResponse`]. [`global_error_handler`]
//! stamps the request ID onto those bodies and turns the router's own plain
//! text errors (unknown route, wrong method) into the same format.

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::cache::CacheError;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Validation, BadRequest → 400
    /// - Cache(InvalidKey) → 400 `VALIDATION_ERROR`
    /// - Cache(UnknownBackend) → 400 `BAD_REQUEST`
    /// - Cache(StoreUnavailable), ConnectionPool → 503
    /// - Cache(Serialization), Database, Configuration, Internal → 500
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Cache(error) => cache_error_response(error),
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => ErrorResponse::new(
                "CONFIGURATION_ERROR",
                &format!("Configuration error: {}", key),
            )
            .with_details(json!({ "key": key })),
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, code = %error_response.code, "Request failed");
        } else {
            tracing::debug!(error = %self, code = %error_response.code, "Request rejected");
        }

        let mut response = (status, Json(error_response.clone())).into_response();
        response.extensions_mut().insert(error_response);
        response
    }
}

fn cache_error_response(error: &CacheError) -> ErrorResponse {
    match error {
        CacheError::InvalidKey(reason) => ErrorResponse::validation_error("key", reason),
        CacheError::UnknownBackend(name) => ErrorResponse::new(
            "BAD_REQUEST",
            &format!("Unknown cache backend '{}'. Valid backends are: memory, redis, sql", name),
        )
        .with_details(json!({ "backend": name })),
        // Store failures can carry connection strings; keep them out of responses.
        CacheError::StoreUnavailable(_) => {
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Cache store unavailable")
        }
        CacheError::Serialization(_) => {
            ErrorResponse::new("SERIALIZATION_ERROR", "Cached value could not be processed")
        }
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Cache(CacheError::InvalidKey(_) | CacheError::UnknownBackend(_)) => {
            StatusCode::BAD_REQUEST
        }
        AppError::Cache(CacheError::StoreUnavailable(_)) | AppError::ConnectionPool { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AppError::Cache(CacheError::Serialization(_))
        | AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } | AppError::Cache(CacheError::InvalidKey(_)) => {
            "VALIDATION_ERROR"
        }
        AppError::BadRequest { .. } | AppError::Cache(CacheError::UnknownBackend(_)) => {
            "BAD_REQUEST"
        }
        AppError::Cache(CacheError::StoreUnavailable(_)) | AppError::ConnectionPool { .. } => {
            "SERVICE_UNAVAILABLE"
        }
        AppError::Cache(CacheError::Serialization(_)) => "SERIALIZATION_ERROR",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn status_to_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_CONTENT",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

/// Gives every error response the `ErrorResponse` shape and the request ID.
///
/// HEAD responses are passed through untouched since they carry no body.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let is_head = request.method() == Method::HEAD;
    let request_id = request.extensions().get::<RequestId>().cloned();

    let response = next.run(request).await;
    let status = response.status();

    if is_head || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();

    let mut error_response = match parts.extensions.remove::<ErrorResponse>() {
        Some(error_response) => error_response,
        None => {
            let bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .unwrap_or_default();
            let message = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("Error").to_string()
            } else {
                message
            };
            ErrorResponse::new(status_to_code(status), &message)
        }
    };

    if let Some(RequestId(id)) = request_id {
        error_response = error_response.with_request_id(&id);
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    let mut rebuilt = (status, Json(error_response)).into_response();
    for (name, value) in parts.headers.iter() {
        if !rebuilt.headers().contains_key(name) {
            rebuilt.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rebuilt
}
