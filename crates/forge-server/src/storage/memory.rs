//! In-memory cache using DashMap (default when no Redis URL is configured)

use async_trait::async_trait;
use dashmap::DashMap;
use forge_core::ports::CacheStore;
use forge_core::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-memory cache with per-key TTL
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
    sweeper: JoinHandle<()>,
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl MemoryCache {
    /// Must be called inside a tokio runtime; starts the expiry sweep
    pub fn new() -> Self {
        let data = Arc::new(DashMap::new());
        let sweeper = Self::start_cleanup_task(data.clone());
        Self { data, sweeper }
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data.iter().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn start_cleanup_task(data: Arc<DashMap<String, CacheEntry>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;

                let now = Instant::now();
                data.retain(|_, entry| entry.expires_at > now);
            }
        })
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.data.get(key).and_then(|entry| {
            if Instant::now() >= entry.expires_at {
                None
            } else {
                Some(entry.value.clone())
            }
        });

        if value.is_none() {
            // Expired entries are dropped on read as well as by the sweep
            self.data
                .remove_if(key, |_, entry| Instant::now() >= entry.expires_at);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn close(&self) {
        self.data.clear();
    }
}
