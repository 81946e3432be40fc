//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech vendor API
    #[serde(default)]
    pub vendor: VendorConfig,

    /// Feedback store
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Admin key for feedback listing
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_vendor()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".to_string(),
                message: "Upload limit must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn validate_vendor(&self) -> Result<(), ConfigError> {
        if self.vendor.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vendor.timeout_seconds".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }

        if !self.vendor.base_url.starts_with("http://") && !self.vendor.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "vendor.base_url".to_string(),
                message: format!("Expected an http(s) URL, got '{}'", self.vendor.base_url),
            });
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if !self.persistence.enabled {
            return Ok(());
        }

        let uri = self.persistence.uri.trim();
        let hosts = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
        let hosts = hosts.split('/').next().unwrap_or_default();
        if hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence.uri".to_string(),
                message: format!("No hosts in store URI '{}'", self.persistence.uri),
            });
        }

        if self.persistence.replication_factor == 0 {
            return Err(ConfigError::InvalidValue {
                field: "persistence.replication_factor".to_string(),
                message: "Replication factor must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Restrict CORS to `cors_origins` (false = allow any origin)
    #[serde(default)]
    pub cors_enabled: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Largest request body accepted (audio uploads)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: false,
            cors_origins: Vec::new(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Speech vendor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Subscription key; set via `API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_vendor_base_url")]
    pub base_url: String,

    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    #[serde(default = "default_vendor_timeout")]
    pub timeout_seconds: u64,
}

fn default_vendor_base_url() -> String {
    "https://api.sarvam.ai".to_string()
}

fn default_stt_model() -> String {
    "saarika:v2".to_string()
}

fn default_tts_model() -> String {
    "bulbul:v2".to_string()
}

fn default_vendor_timeout() -> u64 {
    60
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_vendor_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            timeout_seconds: default_vendor_timeout(),
        }
    }
}

/// Feedback store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Use ScyllaDB (false = in-memory store, for development)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `scylla://host[:port][,host[:port]...][/keyspace]`; set via `STORE_URI`
    #[serde(default = "default_store_uri")]
    pub uri: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_true() -> bool {
    true
}

fn default_store_uri() -> String {
    "scylla://127.0.0.1:9042/test".to_string()
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            uri: default_store_uri(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Admin authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Shared secret for `x-api-key`; set via `API_ADMIN_KEY`
    #[serde(default)]
    pub admin_api_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority: plain deployment variables > `AUDIOGEN__*` > `config/{env}` > `config/default` > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("AUDIOGEN")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true),
    );

    builder = builder
        .set_override_option("vendor.api_key", non_empty_var("API_KEY"))?
        .set_override_option("auth.admin_api_key", non_empty_var("API_ADMIN_KEY"))?
        .set_override_option("persistence.uri", non_empty_var("STORE_URI"))?;

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
