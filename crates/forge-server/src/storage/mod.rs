//! Storage layer
//!
//! SQLite (embedded) is the record store. The cache is Redis when a URL is
//! configured, an in-process DashMap otherwise, or switched off entirely.

pub mod db;
pub mod disabled;
pub mod memory;
pub mod redis_cache;
pub mod schema;

pub use db::Database;
pub use disabled::DisabledCache;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

use crate::config::ServerConfig;
use forge_core::ports::{CacheStore, RecordStore};
use forge_core::Result;
use std::sync::Arc;
use tracing::info;

/// Process-wide store and cache handles
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn CacheStore>,
}

impl Backends {
    /// Open the store (schema included) and the cache.
    ///
    /// If the cache cannot be reached the already-open store is closed
    /// before the error is returned.
    pub async fn connect(config: &ServerConfig) -> Result<Self> {
        info!("Initializing SQLite database...");
        let store: Arc<dyn RecordStore> = Arc::new(
            Database::new(&config.database_path, config.database_max_connections).await?,
        );

        let cache = match Self::connect_cache(config).await {
            Ok(cache) => cache,
            Err(e) => {
                store.close().await;
                return Err(e);
            }
        };

        Ok(Self { store, cache })
    }

    async fn connect_cache(config: &ServerConfig) -> Result<Arc<dyn CacheStore>> {
        if !config.cache_enabled {
            info!("Cache disabled, all reads go to the database");
            return Ok(Arc::new(DisabledCache));
        }

        match &config.redis_url {
            Some(url) => {
                info!("Initializing Redis cache...");
                Ok(Arc::new(
                    RedisCache::connect(url, config.cache_op_timeout()).await?,
                ))
            }
            None => {
                info!("Initializing in-memory cache...");
                Ok(Arc::new(MemoryCache::new()))
            }
        }
    }

    /// Release both pools; safe to call more than once
    pub async fn close(&self) {
        self.cache.close().await;
        self.store.close().await;
        info!("Storage backends closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            database_path: dir.join("forge.db").to_string_lossy().to_string(),
            ..ServerConfig::default()
        }
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("forge-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_connect_and_close() {
        let dir = scratch_dir("backends");
        let backends = Backends::connect(&config_in(&dir)).await.unwrap();

        backends.store.ping().await.unwrap();
        backends.cache.ping().await.unwrap();

        backends.close().await;
        backends.close().await;
        assert!(backends.store.ping().await.is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_cache_connect_reports_error() {
        let dir = scratch_dir("badcache");
        let config = ServerConfig {
            redis_url: Some("redis://127.0.0.1:1/0".to_string()),
            cache_op_timeout_ms: 50,
            ..config_in(&dir)
        };

        assert!(Backends::connect(&config).await.is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
