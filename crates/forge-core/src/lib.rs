//! Forge Core Library
//!
//! Error taxonomy, storage ports, upload validation, cache key policy and
//! the fleet aggregation fold used by the data access layer.

// Re-export pure types from forge-types
pub use forge_types::*;

pub mod aggregate;
pub mod error;
pub mod keys;
pub mod ports;
pub mod upload;

pub use error::{ForgeError, Result};
pub use keys::WriteEvent;
