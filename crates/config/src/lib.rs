//! Configuration management for the speech gateway
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (`AUDIOGEN__` prefix, `__` separator)
//! - The deployment's plain variables: `API_KEY`, `API_ADMIN_KEY`, `STORE_URI`

pub mod settings;

pub use settings::{
    load_settings, AuthConfig, ObservabilityConfig, PersistenceConfig, ServerConfig, Settings,
    VendorConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
