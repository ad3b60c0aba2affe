//! swapcache - Interchangeable cache backends behind one contract
//!
//! Provides a capacity-bounded LRU engine with lazy TTL expiry, an unbounded
//! TTL map and a Redis adapter, all implementing [`cache::Cache`].

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{Cache, LruCache, MemoryCache, RedisCache};
pub use config::Config;
pub use error::{CacheError, Result};
