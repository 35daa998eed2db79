//! Cache entry handlers.
//!
//! Every route addresses one entry as `/cache/{backend}/{key}`. The backend
//! name is resolved per request; unknown or disabled backends are rejected
//! before any store is touched.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CACHE_TAG;
use crate::api::dto::{CacheEntryPath, CacheValue, ErrorResponse, SetEntryQuery};
use crate::api::extract::ValidatedQuery;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Creates cache entry routes.
///
/// Routes:
/// - POST   /cache/{backend}/{key} - Store a JSON value
/// - GET    /cache/{backend}/{key} - Fetch a value
/// - DELETE /cache/{backend}/{key} - Remove a value
/// - HEAD   /cache/{backend}/{key} - Check existence
pub fn cache_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(set_entry, get_entry, remove_entry, entry_exists))
}

/// POST /cache/{backend}/{key} - Store a value
///
/// Replaces any existing entry. `ttl_seconds` sets the lifetime; without it
/// the configured default TTL applies, or the entry never expires.
#[utoipa::path(
    post,
    path = "/cache/{backend}/{key}",
    tag = CACHE_TAG,
    params(CacheEntryPath, SetEntryQuery),
    request_body = CacheValue,
    responses(
        (status = 200, description = "Value stored", body = String, example = json!("Stored.")),
        (status = 400, description = "Invalid key, backend, TTL or body", body = ErrorResponse),
        (status = 503, description = "Backend unavailable", body = ErrorResponse)
    )
)]
async fn set_entry(
    State(state): State<AppState>,
    Path(path): Path<CacheEntryPath>,
    ValidatedQuery(query): ValidatedQuery<SetEntryQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<&'static str>> {
    let cache = state.cache(&path.backend)?;
    let Json(value) = body?;
    let ttl = query
        .ttl_seconds
        .map(Duration::from_secs)
        .or(state.default_ttl);

    cache.set(path.key.as_str(), value, ttl).await?;
    Ok(Json("Stored."))
}

/// GET /cache/{backend}/{key} - Fetch a value
///
/// Missing and expired entries both answer 404.
#[utoipa::path(
    get,
    path = "/cache/{backend}/{key}",
    tag = CACHE_TAG,
    params(CacheEntryPath),
    responses(
        (status = 200, description = "Stored value", body = CacheValue),
        (status = 400, description = "Invalid key or backend", body = ErrorResponse),
        (status = 404, description = "No live entry", body = ErrorResponse),
        (status = 503, description = "Backend unavailable", body = ErrorResponse)
    )
)]
async fn get_entry(
    State(state): State<AppState>,
    Path(path): Path<CacheEntryPath>,
) -> AppResult<Json<Value>> {
    let cache = state.cache(&path.backend)?;

    cache
        .get(path.key.as_str())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::cache_miss(cache.backend().as_str(), &path.key))
}

/// DELETE /cache/{backend}/{key} - Remove a value
#[utoipa::path(
    delete,
    path = "/cache/{backend}/{key}",
    tag = CACHE_TAG,
    params(CacheEntryPath),
    responses(
        (status = 200, description = "Live entry removed", body = String, example = json!("Removed.")),
        (status = 400, description = "Invalid key or backend", body = ErrorResponse),
        (status = 404, description = "No live entry", body = ErrorResponse),
        (status = 503, description = "Backend unavailable", body = ErrorResponse)
    )
)]
async fn remove_entry(
    State(state): State<AppState>,
    Path(path): Path<CacheEntryPath>,
) -> AppResult<Json<&'static str>> {
    let cache = state.cache(&path.backend)?;

    if cache.remove(path.key.as_str()).await? {
        Ok(Json("Removed."))
    } else {
        Err(AppError::cache_miss(cache.backend().as_str(), &path.key))
    }
}

/// HEAD /cache/{backend}/{key} - Check existence
#[utoipa::path(
    head,
    path = "/cache/{backend}/{key}",
    tag = CACHE_TAG,
    params(CacheEntryPath),
    responses(
        (status = 200, description = "Live entry exists"),
        (status = 400, description = "Invalid key or backend"),
        (status = 404, description = "No live entry"),
        (status = 503, description = "Backend unavailable")
    )
)]
async fn entry_exists(
    State(state): State<AppState>,
    Path(path): Path<CacheEntryPath>,
) -> AppResult<StatusCode> {
    let cache = state.cache(&path.backend)?;

    if cache.exists(path.key.as_str()).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::api::routes::create_router;
    use crate::cache::{MemoryStore, StoreResolver};

    fn app(default_ttl: Option<Duration>) -> Router {
        let resolver =
            StoreResolver::new().with_store(Arc::new(MemoryStore::<Value>::with_capacity(
                NonZeroUsize::new(100).unwrap(),
            )));
        create_router(AppState::new(resolver, default_ttl))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let app = app(None);
        let value = json!({ "name": "Ada", "roles": ["admin"] });

        let (status, body) = send(
            &app,
            request(Method::POST, "/cache/memory/user:1", Some(value.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Stored."));

        let (status, body) = send(&app, request(Method::GET, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, value);

        let (status, _) = send(&app, request(Method::HEAD, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&app, request(Method::DELETE, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Removed."));

        let (status, body) = send(&app, request(Method::GET, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, request(Method::HEAD, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, request(Method::DELETE, "/cache/memory/user:1", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backend_name_is_case_insensitive() {
        let app = app(None);

        send(
            &app,
            request(Method::POST, "/cache/Memory/greeting", Some(json!("hello"))),
        )
        .await;
        let (status, body) =
            send(&app, request(Method::GET, "/cache/MEMORY/greeting", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("hello"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_found() {
        let app = app(None);

        let (status, _) = send(
            &app,
            request(
                Method::POST,
                "/cache/memory/session?ttl_seconds=1",
                Some(json!(42)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let (status, _) = send(&app, request(Method::GET, "/cache/memory/session", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_default_ttl_applies_without_query() {
        let app = app(Some(Duration::from_secs(1)));

        send(&app, request(Method::POST, "/cache/memory/short", Some(json!(1)))).await;
        let (status, _) = send(&app, request(Method::HEAD, "/cache/memory/short", None)).await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let (status, _) = send(&app, request(Method::HEAD, "/cache/memory/short", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejected_requests() {
        let app = app(None);

        let (status, body) = send(
            &app,
            request(Method::POST, "/cache/disk/key", Some(json!(1))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");

        let (status, body) = send(&app, request(Method::GET, "/cache/redis/key", None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");

        let (status, body) = send(&app, request(Method::GET, "/cache/memory/%20%20", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/cache/memory/key?ttl_seconds=0",
                Some(json!(1)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        for ttl in ["3153600001", "18446744073709551615"] {
            let (status, body) = send(
                &app,
                request(
                    Method::POST,
                    &format!("/cache/memory/huge-ttl?ttl_seconds={ttl}"),
                    Some(json!(1)),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "ttl_seconds={ttl}");
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
        let (status, _) = send(&app, request(Method::GET, "/cache/memory/huge-ttl", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            request(
                Method::POST,
                "/cache/memory/huge-ttl?ttl_seconds=3153600000",
                Some(json!(1)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/cache/memory/key")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
