//! Forge Types - Pure record definitions
//!
//! Typed records shared by the store, the cache and every front end.
//! No async runtime or database dependencies live here.

pub mod fleet;
pub mod profile;
pub mod ship;

pub use fleet::*;
pub use profile::*;
pub use ship::*;

/// Stable identifier of a member, as supplied by the chat platform
pub type UserId = i64;
