//! Unbounded TTL cache.
//!
//! A plain map with per-entry expiry and no eviction. Prefer [`LruCache`]
//! unless the key space is known to stay small.
//!
//! [`LruCache`]: crate::cache::LruCache

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::cache::{current_timestamp_ms, Cache, CacheEntry};
use crate::error::{CacheError, Result};

/// Map-backed cache without a capacity bound.
///
/// Unlike [`LruCache`](crate::cache::LruCache), a `get` that finds an expired
/// entry reports a miss but leaves the slot in place; it is only reclaimed by
/// a later `set`, `delete` or `purge` of that key.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: V, ttl_seconds: i64) {
        let entry = CacheEntry::new(key.to_string(), value, ttl_seconds);
        self.entries.lock().insert(key.to_string(), entry);
    }

    pub fn delete(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    pub fn purge(&self) {
        self.entries.lock().clear();
    }

    /// Counts non-expired entries. Scans the whole map.
    pub fn len(&self) -> usize {
        let now = current_timestamp_ms();
        self.entries
            .lock()
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied slots, expired or not.
    pub fn slots(&self) -> usize {
        self.entries.lock().len()
    }
}

impl<V: Clone> MemoryCache<V> {
    /// Returns the value for `key` unless it is absent or expired.
    pub fn get(&self, key: &str) -> Result<V> {
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(entry.value.clone()),
            _ => Err(CacheError::Miss),
        }
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        MemoryCache::get(self, key)
    }

    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()> {
        MemoryCache::set(self, key, value, ttl_seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        MemoryCache::delete(self, key);
        Ok(())
    }

    async fn purge(&self) {
        MemoryCache::purge(self);
    }

    async fn size(&self) -> u64 {
        self.len() as u64
    }
}
