//! Property-Based Tests for the LRU engine
//!
//! Uses proptest to check capacity, recency and consistency properties against
//! a simple reference model.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

use crate::cache::{LruCache, MemoryCache, MINIMUM_CAPACITY};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_TTL: i64 = 300;

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Purge,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        5 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Purge),
    ]
}

/// Reference model: front = most recently used.
#[derive(Default)]
struct Model {
    order: VecDeque<(String, u32)>,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    fn set(&mut self, key: String, value: u32, capacity: usize) {
        if let Some(pos) = self.position(&key) {
            self.order.remove(pos);
        }
        self.order.push_front((key, value));
        if self.order.len() > capacity {
            self.order.pop_back();
        }
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let pos = self.position(key)?;
        let item = self.order.remove(pos)?;
        let value = item.1;
        self.order.push_front(item);
        Some(value)
    }

    fn delete(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any interleaving of operations leaves the engine agreeing with the
    // reference model on values, recency order and size.
    #[test]
    fn prop_matches_reference_model(
        capacity in MINIMUM_CAPACITY..20usize,
        ops in prop::collection::vec(cache_op_strategy(), 1..300)
    ) {
        let cache = LruCache::new(capacity);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key, value, TEST_TTL);
                    model.set(key, value, capacity);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key).ok();
                    prop_assert_eq!(got, model.get(&key), "value mismatch for {}", key);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.delete(&key);
                }
                CacheOp::Purge => {
                    cache.purge();
                    model.order.clear();
                }
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.keys(), model.keys());
        }
    }

    // The number of slots never exceeds capacity, however many distinct keys
    // are written.
    #[test]
    fn prop_capacity_enforcement(
        capacity in MINIMUM_CAPACITY..40usize,
        keys in prop::collection::vec("[a-zA-Z0-9_]{1,16}", 1..200)
    ) {
        let cache = LruCache::new(capacity);

        for key in keys {
            cache.set(&key, 0u8, TEST_TTL);
            prop_assert!(
                cache.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                cache.len(),
                capacity
            );
        }
    }

    // Writing capacity + 1 distinct keys evicts exactly the first one.
    #[test]
    fn prop_lru_eviction_order(
        keys in prop::collection::hash_set("[a-z0-9]{1,12}", (MINIMUM_CAPACITY + 1)..30)
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let capacity = keys.len() - 1;
        let cache = LruCache::new(capacity);

        for key in &keys {
            cache.set(key, key.clone(), TEST_TTL);
        }

        prop_assert_eq!(cache.len(), capacity);
        prop_assert!(matches!(cache.get(&keys[0]), Err(CacheError::Miss)));
        for key in keys.iter().skip(1) {
            prop_assert_eq!(cache.get(key).ok(), Some(key.clone()));
        }
    }

    // Touching the would-be victim shifts eviction to the next oldest key.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::hash_set("[a-z0-9]{1,12}", MINIMUM_CAPACITY..30),
        via_set in any::<bool>(),
        new_key in "[A-Z]{1,12}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let cache = LruCache::new(keys.len());

        for key in &keys {
            cache.set(key, 0u32, TEST_TTL);
        }

        if via_set {
            cache.set(&keys[0], 1, TEST_TTL);
        } else {
            prop_assert!(cache.get(&keys[0]).is_ok());
        }

        cache.set(&new_key, 2, TEST_TTL);

        prop_assert!(cache.get(&keys[0]).is_ok());
        prop_assert!(matches!(cache.get(&keys[1]), Err(CacheError::Miss)));
        prop_assert_eq!(cache.get(&new_key).ok(), Some(2));
    }

    // A delete removes only its key, present or not.
    #[test]
    fn prop_delete_removes_only_target(
        keys in prop::collection::hash_set(key_strategy(), 1..10),
        target in key_strategy()
    ) {
        let cache = LruCache::new(MINIMUM_CAPACITY);
        for key in &keys {
            cache.set(key, (), TEST_TTL);
        }

        cache.delete(&target);

        let expected: HashSet<String> = keys.iter().filter(|k| **k != target).cloned().collect();
        let actual: HashSet<String> = cache.keys().into_iter().collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(cache.get(&target).is_err());
    }

    // Non-positive TTLs never produce a hit on either in-process backend.
    #[test]
    fn prop_non_positive_ttl_always_misses(key in key_strategy(), ttl in -3600i64..=0) {
        let lru = LruCache::new(MINIMUM_CAPACITY);
        lru.set(&key, 1u8, ttl);
        prop_assert_eq!(lru.len(), 1);
        prop_assert!(matches!(lru.get(&key), Err(CacheError::Miss)));
        prop_assert_eq!(lru.len(), 0);

        let memory = MemoryCache::new();
        memory.set(&key, 1u8, ttl);
        prop_assert!(matches!(memory.get(&key), Err(CacheError::Miss)));
        prop_assert_eq!(memory.len(), 0);
    }
}
