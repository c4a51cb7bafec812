//! HTTP request handlers

pub mod error;
pub mod fleet;
pub mod hangars;
pub mod health;
pub mod profiles;

pub use error::ApiError;
pub use health::health;
