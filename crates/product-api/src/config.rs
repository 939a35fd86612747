//! Product API configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults. The database URL is redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default SQLite database URL. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:products.db?mode=rwc";

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default maximum database connections in the pool.
pub const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Maximum configurable request timeout in seconds.
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 300;

/// Product API configuration.
#[derive(Clone)]
pub struct Config {
    /// SQLite connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum database connections in the pool (default: 5).
    pub max_db_connections: u32,

    /// Request timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,

    /// Whether to install the metrics recorder at startup (default: true).
    /// When disabled the service runs with a detached emitter and behaves
    /// identically at the HTTP surface.
    pub metrics_enabled: bool,
}

/// Custom Debug implementation that redacts the database URL.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("max_db_connections", &self.max_db_connections)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid max DB connections configuration: {0}")]
    InvalidMaxDbConnections(String),

    #[error("Invalid request timeout configuration: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid metrics flag configuration: {0}")]
    InvalidMetricsFlag(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse max DB connections with validation
        let max_db_connections = if let Some(value_str) = vars.get("PA_MAX_DB_CONNECTIONS") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidMaxDbConnections(format!(
                    "PA_MAX_DB_CONNECTIONS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidMaxDbConnections(
                    "PA_MAX_DB_CONNECTIONS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_MAX_DB_CONNECTIONS
        };

        // Parse request timeout with validation
        let request_timeout_seconds =
            if let Some(value_str) = vars.get("PA_REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidRequestTimeout(format!(
                        "PA_REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidRequestTimeout(
                        "PA_REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                if value > MAX_REQUEST_TIMEOUT_SECONDS {
                    return Err(ConfigError::InvalidRequestTimeout(format!(
                        "PA_REQUEST_TIMEOUT_SECONDS must not exceed {} seconds, got {}",
                        MAX_REQUEST_TIMEOUT_SECONDS, value
                    )));
                }

                value
            } else {
                DEFAULT_REQUEST_TIMEOUT_SECONDS
            };

        // Parse metrics flag
        let metrics_enabled = if let Some(value_str) = vars.get("PA_METRICS_ENABLED") {
            match value_str.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(ConfigError::InvalidMetricsFlag(format!(
                        "PA_METRICS_ENABLED must be true or false, got '{}'",
                        other
                    )))
                }
            }
        } else {
            true
        };

        Ok(Config {
            database_url,
            bind_address,
            max_db_connections,
            request_timeout_seconds,
            metrics_enabled,
        })
    }
}
