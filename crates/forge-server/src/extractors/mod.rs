//! Request extractors

pub mod identity;

pub use identity::{Identity, USER_HEADER};
