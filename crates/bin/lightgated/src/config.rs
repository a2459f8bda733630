//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lightgate.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use lightgate_adapter_virtual::VirtualHubConfig;
use lightgate_domain::target::{TargetKind, TargetSpec};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Hub connection settings.
    pub hub: HubConfig,
    /// Node settings for the event channel.
    pub node: NodeConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Hub connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Hub address. `virtual` selects the built-in simulated hub.
    pub address: String,
    /// Simulated hub contents.
    #[serde(rename = "virtual")]
    pub virtual_hub: VirtualHubConfig,
}

/// Which requests the event channel carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Control requests, dispatched to the hub.
    #[default]
    Control,
    /// Read requests, answered with the fetched objects.
    Query,
}

/// Node configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub role: NodeRole,
    /// Fixed target id. `0` or absent lets each request name its own.
    pub id: Option<u32>,
    /// Fixed target type (`device` or `group`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Emit a result on stdout after every control request.
    pub send_output: bool,
    /// Read JSON events from stdin, one per line.
    pub stdin: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `lightgate.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lightgate.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LIGHTGATE_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("LIGHTGATE_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("LIGHTGATE_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("LIGHTGATE_HUB_ADDRESS") {
            self.hub.address = val;
        }
        if let Some(val) = var("LIGHTGATE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.hub.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hub address must not be empty".to_string(),
            ));
        }
        if let Some(kind) = &self.node.kind {
            TargetKind::parse(kind).map_err(|err| ConfigError::Validation(err.to_string()))?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The node-level target, as configured.
    #[must_use]
    pub fn node_target(&self) -> TargetSpec {
        TargetSpec::new(self.node.id, self.node.kind.as_deref())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            address: "virtual".to_string(),
            virtual_hub: VirtualHubConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lightgated=info,lightgate=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
