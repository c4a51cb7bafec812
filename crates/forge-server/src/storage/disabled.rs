//! Cache that never holds anything
//!
//! Selected with `cache_enabled = false`; every read goes to the store.

use async_trait::async_trait;
use forge_core::ports::CacheStore;
use forge_core::Result;
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
