use utoipa::OpenApi;

pub const CACHE_TAG: &str = "Cache";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "omnicache",
        description = "Key-value cache over memory, Redis and PostgreSQL backends",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::cache::BackendKind,
        )
    ),
    tags(
        (name = CACHE_TAG, description = "Cache entry endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
