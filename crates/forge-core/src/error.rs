//! Error types for the Forge data layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Error, Debug)]
pub enum ForgeError {
    /// Rejected input; nothing was written
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store unreachable or constraint violated; prior state intact
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Cache unreachable; absorbed by the data access layer
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ForgeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ForgeError::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, ForgeError::Persistence(_))
    }
}

impl From<serde_json::Error> for ForgeError {
    fn from(e: serde_json::Error) -> Self {
        ForgeError::Serialization(e.to_string())
    }
}
