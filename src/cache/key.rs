//! Cache key normalization and validation.
//!
//! Keys are built from segments joined with `:`. Every segment is trimmed and
//! lower-cased, and blank segments are dropped, so the same logical key is
//! produced whichever backend it ends up in.

use std::fmt::Display;

use crate::cache::CacheError;

/// Separator placed between key segments.
pub const KEY_SEPARATOR: &str = ":";

/// Maximum key length, in characters.
pub const MAX_KEY_LENGTH: usize = 250;

/// Builds a normalized cache key from its segments.
///
/// ```
/// use omnicache::cache::format_key;
///
/// let key = format_key(["Shop", "Catalog", "Product", "456", "Price", "USD"]);
/// assert_eq!(key, "shop:catalog:product:456:price:usd");
/// assert_eq!(format_key(["", "  ", "x"]), "x");
/// ```
pub fn format_key<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Display,
{
    segments
        .into_iter()
        .map(|segment| segment.to_string().trim().to_lowercase())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Builds a normalized cache key from segments of mixed types.
///
/// ```
/// use omnicache::cache_key;
///
/// assert_eq!(cache_key!("Auth", "Token", "User", 12345), "auth:token:user:12345");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($segment:expr),+ $(,)?) => {
        $crate::cache::format_key([$(($segment).to_string()),+])
    };
}

/// Rejects keys that are blank or longer than [`MAX_KEY_LENGTH`] characters.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidKey(
            "Cache key cannot be empty".to_string(),
        ));
    }

    let length = key.chars().count();
    if length > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Cache key exceeds maximum length ({} > {} chars)",
            length, MAX_KEY_LENGTH
        )));
    }

    Ok(())
}

/// Stringifies and validates a caller-supplied key.
///
/// Stores call this once per operation before touching their backing store.
pub(crate) fn resolve_key<K>(key: &K) -> Result<String, CacheError>
where
    K: Display + ?Sized,
{
    let key = key.to_string();
    validate_key(&key)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_key_joins_and_lowercases() {
        let key = format_key(["Shop", "Catalog", "Product", "456", "Price", "USD"]);
        assert_eq!(key, "shop:catalog:product:456:price:usd");
    }

    #[test]
    fn test_format_key_drops_blank_segments() {
        assert_eq!(format_key(["", "  ", "x"]), "x");
    }

    #[test]
    fn test_format_key_trims_segments() {
        assert_eq!(format_key(["  Prod ", "\ttenantA\n", "invoice"]), "prod:tenanta:invoice");
    }

    #[test]
    fn test_format_key_all_blank_is_empty() {
        assert_eq!(format_key(["", " "]), "");
        assert!(validate_key(&format_key(["", " "])).is_err());
    }

    #[test]
    fn test_cache_key_macro_mixed_types() {
        assert_eq!(
            crate::cache_key!("prod", "tenantA", "invoice", 2024, "inv-001"),
            "prod:tenanta:invoice:2024:inv-001"
        );
    }

    #[test]
    fn test_validate_key_empty() {
        assert!(matches!(validate_key(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(validate_key("   "), Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_validate_key_length_boundary() {
        assert!(validate_key(&"a".repeat(MAX_KEY_LENGTH)).is_ok());
        assert!(matches!(
            validate_key(&"a".repeat(MAX_KEY_LENGTH + 1)),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_validate_key_counts_characters() {
        // 250 two-byte characters are still 250 characters
        assert!(validate_key(&"é".repeat(MAX_KEY_LENGTH)).is_ok());
    }

    #[test]
    fn test_resolve_key_from_display() {
        assert_eq!(resolve_key(&42u32).unwrap(), "42");
        assert!(resolve_key("").is_err());
    }

    proptest! {
        #[test]
        fn prop_format_key_is_idempotent(segments in prop::collection::vec("[ a-zA-Z0-9_-]{0,12}", 0..6)) {
            let once = format_key(&segments);
            let twice = format_key([once.as_str()]);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_format_key_matches_pre_normalized(segments in prop::collection::vec("[ a-zA-Z0-9]{0,12}", 0..6)) {
            let normalized: Vec<String> = segments
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect();
            prop_assert_eq!(format_key(&segments), format_key(&normalized));
        }
    }
}
