//! Data access services

pub mod cache_aside;
pub mod data_access;
pub mod fleet;

pub use cache_aside::{CacheAside, Cacheable};
pub use data_access::DataAccess;
pub use fleet::FleetService;
