//! Cache trait definition.

use async_trait::async_trait;

use crate::error::Result;

/// The operation set every cache backend implements.
///
/// Backends are interchangeable: callers hold an `Arc<dyn Cache<V>>` and never
/// learn which storage sits behind it. A miss (absent or expired key) is
/// reported as [`CacheError::Miss`](crate::error::CacheError::Miss).
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Get a value from the cache.
    async fn get(&self, key: &str) -> Result<V>;

    /// Store a value for `ttl_seconds`. A TTL of zero or below is expired at
    /// the next access.
    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()>;

    /// Remove a value. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Clear all values.
    async fn purge(&self);

    /// Number of entries, as defined by the backend.
    async fn size(&self) -> u64;
}
