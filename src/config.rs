//! Application configuration
//!
//! Loaded from YAML, then `.env`, then environment overrides.

use serde::{Deserialize, Serialize};
use socket_client::ClientConfig;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration shared by the client and server binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub server: ServerConfig,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Messages from loading, logged by `log()` once tracing is up
    #[serde(skip)]
    notices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the time server listens on
    pub bind: String,
    /// Only upgrades on this path are accepted
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            path: "/ws_server".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            server: ServerConfig::default(),
            log_level: "info".to_string(),
            notices: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from YAML file and .env
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();

        let mut config = if config_path.exists() {
            let yaml_content = std::fs::read_to_string(config_path)?;
            Self::from_yaml_str(&yaml_content)?
        } else {
            let mut config = Self::default();
            config
                .notices
                .push(format!("No config file at {}, using defaults", config_path.display()));
            config
        };

        // Load .env file
        dotenv::dotenv().ok(); // Don't fail if .env doesn't exist

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse YAML without applying overrides
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `WS_ENDPOINT` and `WS_BIND` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("WS_ENDPOINT") {
            self.notices
                .push("Overriding client endpoint from environment variable".to_string());
            self.client.endpoint = endpoint;
        }

        if let Some(bind) = lookup("WS_BIND") {
            self.notices
                .push("Overriding server bind address from environment variable".to_string());
            self.server.bind = bind;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.client.has_ws_scheme() {
            return Err(ConfigError::ValidationError(format!(
                "client.endpoint must start with ws:// or wss://, got '{}'",
                self.client.endpoint
            )));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "server.path must start with '/', got '{}'",
                self.server.path
            )));
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Parsed server bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "server.bind must be a socket address, got '{}'",
                self.server.bind
            ))
        })
    }

    /// What happened while loading, in order
    ///
    /// Loading runs before the tracing subscriber exists, so these are kept
    /// here and emitted by [`AppConfig::log`].
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Log load notices and the configuration summary
    pub fn log(&self) {
        for notice in &self.notices {
            info!("{}", notice);
        }
        info!("Configuration loaded:");
        info!("  Client endpoint: {}", self.client.endpoint);
        info!("  Client greeting: {}", self.client.greeting);
        info!("  Server bind: {}{}", self.server.bind, self.server.path);
        info!("  Log level: {}", self.log_level);
    }
}
