//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `forge.toml` (path from `FORGE_CONFIG`), then `FORGE_*` environment
//! variables.

use forge_core::{ForgeError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Config file used when `FORGE_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "forge.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    /// Unset means the in-process cache
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_op_timeout_ms")]
    pub cache_op_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_bind_address() -> String {
    "0.0.0.0:16790".to_string()
}

fn default_database_path() -> String {
    "data/forge.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_op_timeout_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: default_database_path(),
            database_max_connections: default_max_connections(),
            redis_url: None,
            cache_enabled: true,
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_op_timeout_ms: default_cache_op_timeout_ms(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Load from the config file (if present) and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("FORGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("FORGE").try_parsing(true))
            .build()
            .map_err(config_err)?;

        Self::from_config(settings)
    }

    /// Deserialize and validate an already-built configuration
    pub fn from_config(settings: config::Config) -> Result<Self> {
        let config: Self = settings.try_deserialize().map_err(config_err)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database_max_connections == 0 {
            return Err(ForgeError::Config(
                "database_max_connections must be at least 1".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ForgeError::Config(
                "cache_ttl_secs must be at least 1".to_string(),
            ));
        }
        if self.cache_op_timeout_ms == 0 {
            return Err(ForgeError::Config(
                "cache_op_timeout_ms must be at least 1".to_string(),
            ));
        }
        if let Some(url) = &self.redis_url {
            if url.trim().is_empty() {
                return Err(ForgeError::Config("redis_url is set but empty".to_string()));
            }
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms)
    }
}

fn config_err(e: config::ConfigError) -> ForgeError {
    ForgeError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_config(config::Config::builder().build().unwrap()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:16790");
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.database_max_connections, 5);
        assert!(config.cache_enabled);
        assert!(config.redis_url.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let settings = config::Config::builder()
            .set_override("cache_ttl_secs", 60)
            .unwrap()
            .set_override("cache_enabled", false)
            .unwrap()
            .set_override("redis_url", "redis://cache:6379/0")
            .unwrap()
            .set_override("log_format", "json")
            .unwrap()
            .build()
            .unwrap();

        let config = ServerConfig::from_config(settings).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert!(!config.cache_enabled);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/0"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let settings = config::Config::builder()
            .set_override("cache_ttl_secs", 0)
            .unwrap()
            .build()
            .unwrap();

        let err = ServerConfig::from_config(settings).unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let settings = config::Config::builder()
            .set_override("log_format", "xml")
            .unwrap()
            .build()
            .unwrap();

        assert!(ServerConfig::from_config(settings).is_err());
    }
}
