//! Cache entry request DTOs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::cache::MAX_TTL_SECONDS;

/// Path parameters shared by every `/cache/{backend}/{key}` route.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CacheEntryPath {
    /// Backend name, case-insensitive: `memory`, `redis` or `sql`
    #[param(example = "memory")]
    pub backend: String,
    /// Cache key, at most 250 characters
    #[param(example = "shop:catalog:product:456")]
    pub key: String,
}

/// Schema placeholder for stored values: any JSON document.
#[derive(Debug, ToSchema)]
#[schema(value_type = Object, example = json!({"name": "sample", "count": 10}))]
pub struct CacheValue(pub serde_json::Value);

/// Query parameters for storing an entry.
#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SetEntryQuery {
    /// Time to live in seconds, at most 100 years. Without it the configured
    /// default applies, or the entry never expires.
    #[validate(range(
        min = 1,
        max = MAX_TTL_SECONDS,
        message = "ttl_seconds must be between 1 and 3153600000"
    ))]
    #[param(minimum = 1, maximum = 3153600000u64, example = 60)]
    pub ttl_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_seconds_must_be_positive() {
        assert!(SetEntryQuery { ttl_seconds: Some(0) }.validate().is_err());
        assert!(SetEntryQuery { ttl_seconds: Some(1) }.validate().is_ok());
        assert!(SetEntryQuery::default().validate().is_ok());
    }

    #[test]
    fn test_ttl_seconds_is_capped() {
        let at_cap = SetEntryQuery {
            ttl_seconds: Some(MAX_TTL_SECONDS),
        };
        assert!(at_cap.validate().is_ok());

        for ttl in [MAX_TTL_SECONDS + 1, u64::MAX] {
            let query = SetEntryQuery {
                ttl_seconds: Some(ttl),
            };
            assert!(query.validate().is_err(), "ttl {ttl} should be rejected");
        }
    }
}
