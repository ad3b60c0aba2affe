//! LRU Cache Module
//!
//! Capacity-bounded cache engine combining a key index with an arena-backed
//! recency list, lazy TTL expiry and least-recently-used eviction.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::lru::LruList;
use crate::cache::{Cache, CacheEntry};
use crate::error::{CacheError, Result};

/// Smallest capacity the engine accepts.
pub const MINIMUM_CAPACITY: usize = 10;

/// Capacity substituted when the requested one is below [`MINIMUM_CAPACITY`].
pub const DEFAULT_CAPACITY: usize = 500;

// == LRU State ==
/// Index and recency list. Always mutated together under one lock.
#[derive(Debug)]
struct LruState<V> {
    index: HashMap<String, usize>,
    list: LruList<V>,
}

impl<V: Clone> LruState<V> {
    fn get(&mut self, key: &str) -> Result<V> {
        let slot = *self.index.get(key).ok_or(CacheError::Miss)?;

        let expired = self.list.get(slot).map_or(true, CacheEntry::is_expired);
        if expired {
            self.remove(key);
            debug!(key, "removed expired entry on access");
            return Err(CacheError::Miss);
        }

        self.list.move_to_front(slot);
        self.list
            .get(slot)
            .map(|entry| entry.value.clone())
            .ok_or(CacheError::Miss)
    }

    fn set(&mut self, key: &str, value: V, ttl_seconds: i64, capacity: usize) {
        if let Some(slot) = self.index.get(key).copied() {
            if let Some(entry) = self.list.get_mut(slot) {
                entry.refresh(value, ttl_seconds);
            }
            self.list.move_to_front(slot);
            return;
        }

        let slot = self
            .list
            .push_front(CacheEntry::new(key.to_string(), value, ttl_seconds));
        self.index.insert(key.to_string(), slot);

        if self.list.len() > capacity {
            self.evict();
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(slot) = self.index.remove(key) {
            self.list.remove(slot);
        }
    }

    fn evict(&mut self) {
        match self.list.pop_back() {
            Some(entry) => {
                self.index.remove(&entry.key);
                debug!(key = %entry.key, "evicted least recently used entry");
            }
            None => debug!("recency list was empty, nothing to evict"),
        }
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

// == LRU Cache ==
/// Capacity-bounded cache with LRU eviction and lazy TTL expiry.
///
/// Every operation, including `get`, takes the same exclusive lock for its
/// whole duration: a hit reorders the recency list and an expired hit
/// removes the entry, so no operation is read-only.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    state: Mutex<LruState<V>>,
}

impl<V: Clone> LruCache<V> {
    // == Constructor ==
    /// Creates an engine holding at most `capacity` entries.
    ///
    /// A capacity below [`MINIMUM_CAPACITY`] is replaced by
    /// [`DEFAULT_CAPACITY`] and a warning is logged.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity < MINIMUM_CAPACITY {
            warn!(
                "minimum capacity is {}, but got {}. Defaulting to {}",
                MINIMUM_CAPACITY, capacity, DEFAULT_CAPACITY
            );
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        Self {
            capacity,
            state: Mutex::new(LruState {
                index: HashMap::with_capacity(capacity),
                list: LruList::with_capacity(capacity),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Get ==
    /// Returns the value for `key` and promotes it to most recently used.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Result<V> {
        self.state.lock().get(key)
    }

    // == Set ==
    /// Inserts or replaces `key`, then evicts the least recently used entry
    /// if the engine is over capacity.
    pub fn set(&self, key: &str, value: V, ttl_seconds: i64) {
        self.state.lock().set(key, value, ttl_seconds, self.capacity);
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        self.state.lock().remove(key);
    }

    // == Purge ==
    /// Removes every entry. Capacity is unchanged.
    pub fn purge(&self) {
        self.state.lock().clear();
    }

    // == Length ==
    /// Number of occupied slots, including expired entries no `get` has
    /// discovered yet.
    pub fn len(&self) -> usize {
        self.state.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().list.is_empty()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.state
            .lock()
            .list
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }
}

#[async_trait]
impl<V> Cache<V> for LruCache<V>
where
    V: Clone + Send + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        LruCache::get(self, key)
    }

    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()> {
        LruCache::set(self, key, value, ttl_seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        LruCache::delete(self, key);
        Ok(())
    }

    async fn purge(&self) {
        LruCache::purge(self);
    }

    async fn size(&self) -> u64 {
        self.len() as u64
    }
}
