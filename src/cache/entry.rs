//! Cache entry envelope for stores without native per-entry TTL.

use std::time::Duration;

use cached::stores::CanExpire;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::cache::expiry::{compute_expiry_at, is_expired};

/// A cached value with its creation time and optional absolute expiry.
///
/// `expires_on` is fixed when the entry is built; reads never extend it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_on: Timestamp,
    pub expires_on: Option<Timestamp>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry stamped with the current time.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        let created_on = Timestamp::now();
        Self {
            value,
            created_on,
            expires_on: compute_expiry_at(created_on, ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        is_expired(self.expires_on)
    }
}

impl<V> CanExpire for CacheEntry<V> {
    fn is_expired(&self) -> bool {
        CacheEntry::is_expired(self)
    }
}
