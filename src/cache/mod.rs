//! Cache Module
//!
//! One [`Cache`] contract with three interchangeable backends:
//! - [`LruCache`]: capacity-bounded, least-recently-used eviction, lazy TTL expiry
//! - [`MemoryCache`]: unbounded map with TTL expiry
//! - [`RedisCache`]: a Redis logical database

mod entry;
mod lru;
mod memory;
mod remote;
mod store;
mod traits;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::{BackendKind, Config};
use crate::error::Result;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use memory::MemoryCache;
pub use remote::RedisCache;
pub use store::{LruCache, DEFAULT_CAPACITY, MINIMUM_CAPACITY};
pub use traits::Cache;

/// Shared handle to whichever backend was configured.
pub type SharedCache = Arc<dyn Cache<Value>>;

// == Backend Factory ==
/// Constructs the backend selected by `config`.
///
/// The Redis backend connects and pings here, so an unreachable server fails
/// startup instead of the first request.
pub async fn build(config: &Config) -> Result<SharedCache> {
    let cache: SharedCache = match config.backend {
        BackendKind::Lru => Arc::new(LruCache::<Value>::new(config.capacity)),
        BackendKind::Memory => Arc::new(MemoryCache::<Value>::new()),
        BackendKind::Redis => Arc::new(RedisCache::<Value>::connect(&config.redis).await?),
    };

    info!(backend = %config.backend, "cache backend initialized");
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_lru() {
        let config = Config {
            capacity: 20,
            ..Config::default()
        };
        let cache = build(&config).await.unwrap();

        for i in 0..25 {
            cache.set(&i.to_string(), Value::from(i), 60).await.unwrap();
        }
        assert_eq!(cache.size().await, 20);
        assert!(cache.get("0").await.unwrap_err().is_miss());
    }

    #[tokio::test]
    async fn test_build_memory() {
        let config = Config {
            backend: BackendKind::Memory,
            capacity: 20,
            ..Config::default()
        };
        let cache = build(&config).await.unwrap();

        for i in 0..25 {
            cache.set(&i.to_string(), Value::from(i), 60).await.unwrap();
        }
        assert_eq!(cache.size().await, 25);
    }

    #[tokio::test]
    async fn test_build_redis_unreachable_fails() {
        let mut config = Config {
            backend: BackendKind::Redis,
            ..Config::default()
        };
        config.redis.addr = "127.0.0.1:1".to_string();
        config.redis.timeout = std::time::Duration::from_millis(300);

        assert!(build(&config).await.is_err());
    }
}
