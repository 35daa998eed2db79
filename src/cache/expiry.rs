//! Expiry computation shared by every store that tracks expiry itself.

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};

/// Longest TTL any store honors, in seconds (100 years).
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// Longer TTLs are clamped to this by every store.
pub const MAX_TTL: Duration = Duration::from_secs(MAX_TTL_SECONDS);

/// Clamps a TTL to [`MAX_TTL`].
pub fn clamp_ttl(ttl: Duration) -> Duration {
    ttl.min(MAX_TTL)
}

/// Absolute expiry for a relative TTL, or `None` when the entry never expires.
pub fn compute_expiry(ttl: Option<Duration>) -> Option<Timestamp> {
    compute_expiry_at(Timestamp::now(), ttl)
}

/// Same as [`compute_expiry`], relative to `now`.
///
/// The TTL is clamped to [`MAX_TTL`]; a result past the timestamp range
/// saturates to [`Timestamp::MAX`].
pub fn compute_expiry_at(now: Timestamp, ttl: Option<Duration>) -> Option<Timestamp> {
    ttl.map(|ttl| {
        SignedDuration::try_from(clamp_ttl(ttl))
            .ok()
            .and_then(|ttl| now.checked_add(ttl).ok())
            .unwrap_or(Timestamp::MAX)
    })
}

/// Whether an entry with the given expiry is no longer readable.
pub fn is_expired(expires_on: Option<Timestamp>) -> bool {
    is_expired_at(Timestamp::now(), expires_on)
}

/// Same as [`is_expired`], evaluated at `now`. An entry expiring exactly at
/// `now` is expired.
pub fn is_expired_at(now: Timestamp, expires_on: Option<Timestamp>) -> bool {
    expires_on.is_some_and(|expires_on| expires_on <= now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_expiry_none_never_expires() {
        assert_eq!(compute_expiry(None), None);
        assert!(!is_expired(None));
    }

    #[test]
    fn test_compute_expiry_adds_ttl() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let expires = compute_expiry_at(now, Some(Duration::from_secs(90))).unwrap();
        assert_eq!(expires.as_second(), 1_700_000_090);
    }

    #[test]
    fn test_compute_expiry_clamps_to_max_ttl() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let expected = compute_expiry_at(now, Some(MAX_TTL));

        assert_eq!(compute_expiry_at(now, Some(Duration::MAX)), expected);
        assert_eq!(
            compute_expiry_at(now, Some(Duration::from_secs(u64::MAX))),
            expected
        );
        assert_eq!(
            expected.unwrap().as_second(),
            1_700_000_000 + MAX_TTL_SECONDS as i64
        );
    }

    #[test]
    fn test_compute_expiry_saturates_near_timestamp_max() {
        let now = Timestamp::MAX;
        assert_eq!(
            compute_expiry_at(now, Some(Duration::from_secs(1))),
            Some(Timestamp::MAX)
        );
    }

    #[test]
    fn test_clamp_ttl() {
        assert_eq!(clamp_ttl(Duration::from_secs(60)), Duration::from_secs(60));
        assert_eq!(clamp_ttl(MAX_TTL), MAX_TTL);
        assert_eq!(clamp_ttl(Duration::MAX), MAX_TTL);
    }

    #[test]
    fn test_is_expired_boundary_is_expired() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        assert!(is_expired_at(now, Some(now)));
    }

    #[test]
    fn test_is_expired_before_and_after() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let later = Timestamp::from_second(1_700_000_001).unwrap();
        let earlier = Timestamp::from_second(1_699_999_999).unwrap();
        assert!(!is_expired_at(now, Some(later)));
        assert!(is_expired_at(now, Some(earlier)));
    }

    #[test]
    fn test_fresh_expiry_is_not_expired() {
        assert!(!is_expired(compute_expiry(Some(Duration::from_secs(60)))));
        assert!(is_expired(compute_expiry(Some(Duration::ZERO))));
    }
}
