//! Stored Entry Module
//!
//! A cached value together with its optional absolute expiry.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Entry ==
/// A value held by a store, with an optional expiration timestamp.
///
/// Value and expiry live in the same slot so an overwrite replaces both
/// under one lock acquisition.
#[derive(Debug, Clone)]
pub struct StoredEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
}

impl<V> StoredEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` from now, or never.
    pub fn new(value: V, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl_seconds.map(|ttl| now.saturating_add(ttl.saturating_mul(1000)));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks the entry against the given clock reading.
    ///
    /// An entry is expired once `now >= expires_at`. Lazy eviction and
    /// the background sweep both go through this predicate.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    /// Checks the entry against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns whole seconds until expiry, clamped at zero, or None
    /// when the entry never expires.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
