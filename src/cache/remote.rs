//! Redis-backed cache.
//!
//! Forwards the [`Cache`] operations to a Redis logical database. Values are
//! stored JSON-encoded so any serde type can round-trip through the server.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client, RedisResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::Cache;
use crate::config::RedisOptions;
use crate::error::{CacheError, Result};

/// Cache backed by a Redis server.
///
/// Every call is bounded by the configured operation timeout; a call still
/// outstanding when it elapses is dropped and reported as
/// [`CacheError::Cancelled`].
pub struct RedisCache<V> {
    conn: ConnectionManager,
    timeout: Duration,
    _value: PhantomData<fn() -> V>,
}

impl<V> std::fmt::Debug for RedisCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<V> RedisCache<V> {
    /// Connects to the configured server and checks it answers `PING`.
    ///
    /// Fails immediately rather than on first use when the server is
    /// unreachable or rejects the credentials.
    pub async fn connect(options: &RedisOptions) -> Result<Self> {
        let client = Client::open(options.connection_info()?)?;

        let connected = async {
            let mut conn = deadline(options.timeout, ConnectionManager::new(client)).await?;
            let pong: String =
                deadline(options.timeout, ::redis::cmd("PING").query_async(&mut conn)).await?;
            debug!(addr = %options.addr, db = options.db, reply = %pong, "redis answered ping");
            Ok::<_, CacheError>(conn)
        }
        .await;

        match connected {
            Ok(conn) => Ok(Self {
                conn,
                timeout: options.timeout,
                _value: PhantomData,
            }),
            Err(err) => {
                error!(error = %err, addr = %options.addr, "error connecting to redis");
                Err(err)
            }
        }
    }
}

/// Runs a Redis call under `limit`, mapping an elapsed deadline to
/// [`CacheError::Cancelled`].
async fn deadline<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Cancelled(limit)),
    }
}

#[async_trait]
impl<V> Cache<V> for RedisCache<V>
where
    V: Serialize + DeserializeOwned + Send + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = deadline(self.timeout, conn.get(key)).await?;

        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Err(CacheError::Miss),
        }
    }

    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()> {
        let mut conn = self.conn.clone();

        // Redis rejects a zero expiry; dropping the key gives the same
        // "missing on next access" outcome.
        if ttl_seconds <= 0 {
            let _: i64 = deadline(self.timeout, conn.del(key)).await?;
            return Ok(());
        }

        let payload = serde_json::to_string(&value)?;
        let _: () = deadline(
            self.timeout,
            conn.set_ex(key, payload, ttl_seconds as u64),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = deadline(self.timeout, conn.del(key)).await?;
        Ok(())
    }

    async fn purge(&self) {
        let mut conn = self.conn.clone();
        let flushed: Result<()> =
            deadline(self.timeout, ::redis::cmd("FLUSHDB").query_async(&mut conn)).await;

        if let Err(err) = flushed {
            warn!(error = %err, "failed to flush redis DB");
        }
    }

    async fn size(&self) -> u64 {
        let mut conn = self.conn.clone();
        let size: Result<u64> =
            deadline(self.timeout, ::redis::cmd("DBSIZE").query_async(&mut conn)).await;

        size.unwrap_or_else(|err| {
            warn!(error = %err, "failed to return size of redis cache");
            0
        })
    }
}
