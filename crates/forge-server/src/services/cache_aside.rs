//! Cache-aside reads and write invalidation
//!
//! The store is always the source of truth. Cache failures are logged and
//! absorbed here; callers only ever see store errors.

use forge_core::ports::CacheStore;
use forge_core::{Result, WriteEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Whether a loaded value is worth caching. Empty or absent results are
/// not, so a later write is never masked by a cached "nothing".
pub trait Cacheable {
    fn is_cacheable(&self) -> bool;
}

impl<T> Cacheable for Option<T> {
    fn is_cacheable(&self) -> bool {
        self.is_some()
    }
}

impl<T> Cacheable for Vec<T> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Cacheable for BTreeSet<T> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Cacheable for BTreeMap<K, V> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    /// Bumped by every invalidation; a load that overlaps one is not cached
    write_epoch: Arc<AtomicU64>,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            write_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the cache answers; an unreachable cache only costs speed
    pub async fn ping(&self) -> bool {
        match self.cache.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache ping failed: {}", e);
                false
            }
        }
    }

    /// Serve `key` from the cache, or run `load` against the store and cache its result
    pub async fn cached<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    self.forget(key).await;
                }
            },
            Ok(None) => debug!("Cache miss: {}", key),
            Err(e) => warn!("Cache read failed for {}, using database: {}", key, e),
        }

        let epoch = self.write_epoch.load(Ordering::Acquire);
        let value = load().await?;

        if value.is_cacheable() {
            self.populate(key, &value, epoch).await;
        }
        Ok(value)
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T, epoch: u64) {
        if self.write_epoch.load(Ordering::Acquire) != epoch {
            debug!("Write landed during load of {}, not caching", key);
            return;
        }

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.cache.set(key, bytes, self.ttl).await {
            warn!("Cache write failed for {}: {}", key, e);
            return;
        }

        // An invalidation that raced the set above may have run before it
        if self.write_epoch.load(Ordering::Acquire) != epoch {
            self.forget(key).await;
        }
    }

    /// Drop every entry a committed write may have changed. Never fails.
    pub async fn invalidate(&self, event: &WriteEvent) {
        self.write_epoch.fetch_add(1, Ordering::AcqRel);
        for key in event.affected_keys() {
            self.forget(&key).await;
        }
    }

    async fn forget(&self, key: &str) {
        match self.cache.delete(key).await {
            Ok(()) => debug!("Cache invalidated: {}", key),
            Err(e) => warn!(
                "Cache delete failed for {}, entry will expire after {:?}: {}",
                key, self.ttl, e
            ),
        }
    }
}
