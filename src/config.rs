//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ERC20_RELAYER_CONFIG_FILE` | Path to the TOML file | `config.toml` |
//! | `ERC20_RELAYER_REST_HOST` | REST server host | `0.0.0.0` |
//! | `ERC20_RELAYER_REST_PORT` | REST server port | `8080` |
//! | `ERC20_RELAYER_LOG_LEVEL` | Log level | `info` |
//! | `ERC20_RELAYER_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `ERC20_RELAYER_FEE_AWARE` | Plan fees before submitting | `true` |
//! | `RELAYER_PRIVATE_KEY` | Relayer signing key (hex) | unset |
//! | `SPENDER_ADDRESS` | Spender checked by token info | relayer address |
//! | `TRANSFER_RECIPIENT` | Fixed recipient for every transfer | unset |
//! | `<NET>_RPC_URL`, `RPC_<NET>`, `NEXT_PUBLIC_RPC_<NET>` | RPC endpoint per network | unset |
//!
//! # Examples
//!
//! ```ignore
//! use erc20_relayer::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("REST server: {}:{}", config.rest.host, config.rest.port);
//! ```

use crate::domain::services::fee_planner::DEFAULT_PRIORITY_FEE_WEI;
use crate::domain::value_objects::{Network, is_valid_address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,

    /// Enable CORS.
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
            enable_cors: true,
            cors_origins: Vec::new(),
        }
    }
}

impl RestConfig {
    /// Returns the socket address for the REST server.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid("rest.host:port", format!("{e}")))
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Relayer Configuration
// ============================================================================

/// Relayer wallet and submission settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Hex private key of the relayer wallet.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Spender whose allowance token info reports. Defaults to the relayer address.
    #[serde(default)]
    pub spender_address: Option<String>,

    /// When set, every transfer goes to this address.
    #[serde(default)]
    pub recipient_override: Option<String>,

    /// Estimate gas and plan fees before submitting.
    #[serde(default = "default_true")]
    pub fee_aware: bool,

    /// EIP-1559 priority fee in wei.
    #[serde(default = "default_priority_fee_wei")]
    pub priority_fee_wei: u64,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            spender_address: None,
            recipient_override: None,
            fee_aware: true,
            priority_fee_wei: default_priority_fee_wei(),
        }
    }
}

impl fmt::Debug for RelayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayerConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("spender_address", &self.spender_address)
            .field("recipient_override", &self.recipient_override)
            .field("fee_aware", &self.fee_aware)
            .field("priority_fee_wei", &self.priority_fee_wei)
            .finish()
    }
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Per-network settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// JSON-RPC endpoint.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Extra tokens, symbol to address, merged over the built-in table.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Relayer configuration.
    #[serde(default)]
    pub relayer: RelayerConfig,

    /// Network settings keyed by network name.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkSettings>,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = std::env::var("ERC20_RELAYER_CONFIG_FILE")
            .unwrap_or_else(|_| "config.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid configuration TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies overrides from `lookup`, typically the process environment.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // REST configuration
        if let Some(host) = get("ERC20_RELAYER_REST_HOST") {
            self.rest.host = host;
        }
        if let Some(port) = get("ERC20_RELAYER_REST_PORT")
            && let Ok(p) = port.trim().parse()
        {
            self.rest.port = p;
        }

        // Logging configuration
        if let Some(level) = get("ERC20_RELAYER_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = get("ERC20_RELAYER_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Relayer configuration
        if let Some(key) = get("RELAYER_PRIVATE_KEY") {
            self.relayer.private_key = Some(key.trim().to_string());
        }
        if let Some(spender) = get("SPENDER_ADDRESS") {
            self.relayer.spender_address = Some(spender.trim().to_string());
        }
        if let Some(recipient) = get("TRANSFER_RECIPIENT") {
            self.relayer.recipient_override = Some(recipient.trim().to_string());
        }
        if let Some(flag) = get("ERC20_RELAYER_FEE_AWARE")
            && let Ok(fee_aware) = flag.trim().to_lowercase().parse()
        {
            self.relayer.fee_aware = fee_aware;
        }

        // RPC endpoints, first non-blank variable wins
        for network in Network::ALL {
            let url = network.rpc_env_vars().iter().find_map(|var| get(var.as_str()));
            if let Some(url) = url {
                self.network_entry(network).rpc_url = Some(url.trim().to_string());
            }
        }
    }

    /// Returns the settings for `network`, if any were configured.
    #[must_use]
    pub fn network(&self, network: Network) -> Option<&NetworkSettings> {
        self.networks
            .iter()
            .find(|(name, _)| name.parse::<Network>().ok() == Some(network))
            .map(|(_, settings)| settings)
    }

    fn network_entry(&mut self, network: Network) -> &mut NetworkSettings {
        let key = self
            .networks
            .keys()
            .find(|name| name.parse::<Network>().ok() == Some(network))
            .cloned()
            .unwrap_or_else(|| network.as_str().to_string());
        self.networks.entry(key).or_default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rest.socket_addr()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if let Some(key) = &self.relayer.private_key
            && !is_valid_private_key(key)
        {
            return Err(ConfigError::invalid(
                "relayer.private_key",
                "expected 32 bytes of hex",
            ));
        }

        for (field, address) in [
            ("relayer.spender_address", &self.relayer.spender_address),
            ("relayer.recipient_override", &self.relayer.recipient_override),
        ] {
            if let Some(address) = address
                && !is_valid_address(address)
            {
                return Err(ConfigError::invalid(field, format!("invalid address '{address}'")));
            }
        }

        for (name, settings) in &self.networks {
            if name.parse::<Network>().is_err() {
                return Err(ConfigError::invalid(
                    format!("networks.{name}"),
                    "unsupported network",
                ));
            }
            for (symbol, address) in &settings.tokens {
                if !is_valid_address(address) {
                    return Err(ConfigError::invalid(
                        format!("networks.{name}.tokens.{symbol}"),
                        format!("invalid address '{address}'"),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn is_valid_private_key(key: &str) -> bool {
    let hex = key.strip_prefix("0x").unwrap_or(key);
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_priority_fee_wei() -> u64 {
    DEFAULT_PRIORITY_FEE_WEI
}
