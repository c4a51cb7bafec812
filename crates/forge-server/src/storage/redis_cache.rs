//! Redis cache backend (shared across server instances)

use async_trait::async_trait;
use forge_core::ports::CacheStore;
use forge_core::{ForgeError, Result};
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Redis-backed cache; every call is bounded by `op_timeout`
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect and verify the server answers PING
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| ForgeError::CacheUnavailable(format!("Invalid Redis URL: {}", e)))?;

        let conn = tokio::time::timeout(op_timeout * 10, ConnectionManager::new(client))
            .await
            .map_err(|_| ForgeError::CacheUnavailable("Timed out connecting to Redis".into()))?
            .map_err(|e| {
                ForgeError::CacheUnavailable(format!("Failed to connect to Redis: {}", e))
            })?;

        let cache = Self { conn, op_timeout };
        cache.ping().await?;

        info!("Connected to Redis cache");
        Ok(cache)
    }

    async fn run<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ForgeError::CacheUnavailable(format!("{} failed: {}", op, e))),
            Err(_) => Err(ForgeError::CacheUnavailable(format!(
                "{} timed out after {:?}",
                op, self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        self.run("GET", async move {
            redis::cmd("GET")
                .arg(key)
                .query_async::<_, Option<Vec<u8>>>(&mut conn)
                .await
        })
        .await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // Redis rejects EX 0
        let seconds = ttl.as_secs().max(1);
        self.run("SET", async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(seconds)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        self.run("DEL", async move {
            redis::cmd("DEL")
                .arg(key)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        self.run("PING", async move {
            redis::cmd("PING")
                .query_async::<_, String>(&mut conn)
                .await
        })
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_cache_unavailable() {
        let result = RedisCache::connect("not-a-redis-url", Duration::from_millis(50)).await;
        assert!(matches!(result, Err(ForgeError::CacheUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_cache_unavailable() {
        // Port 1 is reserved and never has a Redis server behind it
        let result =
            RedisCache::connect("redis://127.0.0.1:1/0", Duration::from_millis(50)).await;
        assert!(matches!(result, Err(ForgeError::CacheUnavailable(_))));
    }
}
