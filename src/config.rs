//! Configuration Module
//!
//! Handles loading backend and server configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::CacheError;

/// Which cache backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Capacity-bounded LRU engine
    #[default]
    Lru,
    /// Unbounded TTL map
    Memory,
    /// Remote Redis server
    Redis,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(BackendKind::Lru),
            "memory" | "in_memory" => Ok(BackendKind::Memory),
            "redis" => Ok(BackendKind::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Lru => "lru",
            BackendKind::Memory => "memory",
            BackendKind::Redis => "redis",
        };
        f.write_str(name)
    }
}

/// Connection parameters for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisOptions {
    /// `host:port` of the server
    pub addr: String,
    /// Password for `AUTH`, if any
    pub password: Option<String>,
    /// Logical database index
    pub db: i64,
    /// Deadline applied to every call, including the initial connect
    pub timeout: Duration,
}

impl RedisOptions {
    /// Builds the client connection parameters for these options.
    ///
    /// The password is passed through as-is rather than embedded in a URL, so
    /// it may contain any character.
    pub fn connection_info(&self) -> crate::error::Result<ConnectionInfo> {
        let invalid =
            |reason: &str| CacheError::Config(format!("{} in '{}'", reason, self.addr));

        let (host, port) = self
            .addr
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing redis port"))?;
        let port: u16 = port.parse().map_err(|_| invalid("invalid redis port"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid("missing redis host"));
        }

        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(host.to_string(), port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone().filter(|p| !p.is_empty()),
                ..RedisConnectionInfo::default()
            },
        })
    }
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            password: None,
            db: 0,
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend selected at startup
    pub backend: BackendKind,
    /// Maximum number of entries for the LRU backend
    pub capacity: usize,
    /// Default TTL in seconds for requests without explicit TTL
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection parameters
    pub redis: RedisOptions,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `lru`, `memory` or `redis` (default: lru)
    /// - `CACHE_CAPACITY` - LRU capacity (default: 500)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REDIS_ADDR` - Redis `host:port` (default: 127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - Redis password (default: none)
    /// - `REDIS_DB` - Redis logical database (default: 0)
    /// - `REDIS_TIMEOUT_MS` - Per-call deadline in milliseconds (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: env_or("CACHE_BACKEND", defaults.backend),
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            redis: RedisOptions {
                addr: env::var("REDIS_ADDR").unwrap_or(defaults.redis.addr),
                password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
                db: env_or("REDIS_DB", defaults.redis.db),
                timeout: Duration::from_millis(env_or(
                    "REDIS_TIMEOUT_MS",
                    defaults.redis.timeout.as_millis() as u64,
                )),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Lru,
            capacity: DEFAULT_CAPACITY,
            default_ttl: 300,
            server_port: 3000,
            redis: RedisOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "CACHE_BACKEND",
        "CACHE_CAPACITY",
        "DEFAULT_TTL",
        "SERVER_PORT",
        "REDIS_ADDR",
        "REDIS_PASSWORD",
        "REDIS_DB",
        "REDIS_TIMEOUT_MS",
    ];

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Lru);
        assert_eq!(config.capacity, 500);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.redis.addr, "127.0.0.1:6379");
        assert_eq!(config.redis.timeout, Duration::from_secs(2));
    }

    // Single test touching the environment so parallel tests cannot race on it.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.backend, BackendKind::Lru);
        assert_eq!(config.capacity, 500);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
        assert!(config.redis.password.is_none());

        env::set_var("CACHE_BACKEND", "Redis");
        env::set_var("CACHE_CAPACITY", "not-a-number");
        env::set_var("REDIS_DB", "3");
        env::set_var("REDIS_PASSWORD", "");
        env::set_var("REDIS_TIMEOUT_MS", "150");

        let config = Config::from_env();
        assert_eq!(config.backend, BackendKind::Redis);
        assert_eq!(config.capacity, 500);
        assert_eq!(config.redis.db, 3);
        assert!(config.redis.password.is_none());
        assert_eq!(config.redis.timeout, Duration::from_millis(150));

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("lru".parse::<BackendKind>(), Ok(BackendKind::Lru));
        assert_eq!(" MEMORY ".parse::<BackendKind>(), Ok(BackendKind::Memory));
        assert_eq!("redis".parse::<BackendKind>(), Ok(BackendKind::Redis));
        assert!("memcached".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Memory.to_string(), "memory");
    }

    fn tcp_target(info: &ConnectionInfo) -> (String, u16) {
        match &info.addr {
            ConnectionAddr::Tcp(host, port) => (host.clone(), *port),
            other => panic!("expected plain TCP address, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_info() {
        let options = RedisOptions {
            addr: "cache.internal:6380".to_string(),
            db: 2,
            ..RedisOptions::default()
        };

        let info = options.connection_info().unwrap();
        assert_eq!(tcp_target(&info), ("cache.internal".to_string(), 6380));
        assert_eq!(info.redis.db, 2);
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn test_connection_info_keeps_special_password_intact() {
        let options = RedisOptions {
            addr: "cache.internal:6380".to_string(),
            password: Some("p@ss/w#rd:%20".to_string()),
            db: 2,
            ..RedisOptions::default()
        };

        let info = options.connection_info().unwrap();
        assert_eq!(tcp_target(&info), ("cache.internal".to_string(), 6380));
        assert_eq!(info.redis.db, 2);
        assert_eq!(info.redis.password.as_deref(), Some("p@ss/w#rd:%20"));

        // the client accepts it without reparsing host or database
        assert!(redis::Client::open(info).is_ok());
    }

    #[test]
    fn test_connection_info_ipv6_and_empty_password() {
        let options = RedisOptions {
            addr: "[::1]:6379".to_string(),
            password: Some(String::new()),
            ..RedisOptions::default()
        };

        let info = options.connection_info().unwrap();
        assert_eq!(tcp_target(&info), ("::1".to_string(), 6379));
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn test_connection_info_rejects_bad_addr() {
        for addr in ["localhost", "localhost:port", ":6379"] {
            let options = RedisOptions {
                addr: addr.to_string(),
                ..RedisOptions::default()
            };
            assert!(matches!(
                options.connection_info(),
                Err(CacheError::Config(_))
            ));
        }
    }
}
