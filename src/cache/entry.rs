//! Cache Entry Module
//!
//! Defines the record stored by the in-process backends and its expiry check.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached record: key, value and absolute expiration.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key under which the entry is indexed
    pub key: String,
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` from now.
    ///
    /// A TTL of zero or below produces an entry that is already expired.
    pub fn new(key: String, value: V, ttl_seconds: i64) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_from_now(ttl_seconds),
        }
    }

    // == Refresh ==
    /// Replaces the value and recomputes the expiration in place.
    pub fn refresh(&mut self, value: V, ttl_seconds: i64) {
        self.value = value;
        self.expires_at = expiry_from_now(ttl_seconds);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// zero TTL is expired on the very next check.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
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

fn expiry_from_now(ttl_seconds: i64) -> u64 {
    let now = current_timestamp_ms();
    if ttl_seconds <= 0 {
        now
    } else {
        now.saturating_add((ttl_seconds as u64).saturating_mul(1000))
    }
}
