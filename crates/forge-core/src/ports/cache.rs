//! Cache port
//!
//! Values are opaque bytes; callers own the encoding. A missing key is a
//! normal outcome, errors mean the cache itself could not be reached.

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}
