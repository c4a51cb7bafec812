//! Port traits (interfaces) for dependency injection

pub mod cache;
pub mod store;

pub use cache::CacheStore;
pub use store::{InventoryStore, ProfileStore, RecordStore};
