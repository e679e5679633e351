//! Portfolio snapshot cache.
//!
//! `PortfolioCache` is a capability chosen once at startup: Redis when caching is
//! enabled, `NoopPortfolioCache` otherwise. Callers never branch on which one
//! they hold.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tracing::trace;

const KEY_PREFIX: &str = "github:repos:";
/// Characters of the credential kept in the cache key.
const FINGERPRINT_LEN: usize = 10;
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis did not respond within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait PortfolioCache: Send + Sync {
    /// `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, snapshot: &str, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache key for a credential: a fixed-length prefix, never the full secret.
pub fn portfolio_key(credential: &str) -> String {
    let fingerprint: String = credential.chars().take(FINGERPRINT_LEN).collect();
    format!("{KEY_PREFIX}{fingerprint}")
}

/// Redis-backed cache. Expiry is left to Redis via `SETEX`.
///
/// One `ConnectionManager` is opened at startup and cloned per operation; it
/// reconnects on its own after a dropped connection.
pub struct RedisPortfolioCache {
    conn: ConnectionManager,
}

impl RedisPortfolioCache {
    /// Opens the shared connection, failing if Redis is not reachable within
    /// `connect_timeout`.
    pub async fn connect(redis_url: &str, connect_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(connect_timeout))??;
        Ok(Self { conn })
    }
}

#[async_trait]
impl PortfolioCache for RedisPortfolioCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        trace!("Cache {}: {}", if value.is_some() { "hit" } else { "miss" }, key);
        Ok(value)
    }

    async fn put(&self, key: &str, snapshot: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .arg(snapshot)
            .query_async::<_, ()>(&mut conn)
            .await?;
        trace!("Cache set: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// Cache used when caching is turned off: every read misses, writes vanish.
pub struct NoopPortfolioCache;

#[async_trait]
impl PortfolioCache for NoopPortfolioCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _snapshot: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-process stand-in for Redis. Ignores TTL.
    #[derive(Default)]
    pub(crate) struct MemoryCache {
        pub(crate) entries: Mutex<HashMap<String, String>>,
        pub(crate) fail_writes: bool,
    }

    #[async_trait]
    impl PortfolioCache for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, snapshot: &str, _ttl: Duration) -> Result<(), CacheError> {
            if self.fail_writes {
                return Err(CacheError::Redis(redis::RedisError::from((
                    redis::ErrorKind::IoError,
                    "connection refused",
                ))));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), snapshot.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// A cache whose chosen operations never complete, like an unreachable Redis.
    #[derive(Default)]
    pub(crate) struct StalledCache {
        pub(crate) stall_reads: bool,
        pub(crate) stall_writes: bool,
    }

    #[async_trait]
    impl PortfolioCache for StalledCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            if self.stall_reads {
                std::future::pending::<()>().await;
            }
            Ok(None)
        }

        async fn put(&self, _key: &str, _snapshot: &str, _ttl: Duration) -> Result<(), CacheError> {
            if self.stall_writes {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            if self.stall_writes {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    #[test]
    fn test_key_truncates_credential() {
        assert_eq!(
            portfolio_key("gho_abcdefghijklmnop"),
            "github:repos:gho_abcdef"
        );
    }

    #[test]
    fn test_key_keeps_short_credentials_whole() {
        assert_eq!(portfolio_key("abc"), "github:repos:abc");
    }

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopPortfolioCache;
        cache.put("k", "v", DEFAULT_TTL).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        cache.delete("k").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_cache_set_get_delete() {
        let cache = RedisPortfolioCache::connect("redis://127.0.0.1:6379", Duration::from_secs(2))
            .await
            .unwrap();

        cache.put("test_key", "test_value", DEFAULT_TTL).await.unwrap();
        assert_eq!(
            cache.get("test_key").await.unwrap().as_deref(),
            Some("test_value")
        );

        cache.delete("test_key").await.unwrap();
        assert_eq!(cache.get("test_key").await.unwrap(), None);
    }
}
