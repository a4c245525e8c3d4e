//! # Configuration Management
//!
//! Centralized configuration for the RCON client.
//!
//! ## Configuration Sources
//! - Environment variables via `from_env()` (the usual deployment path)
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//!
//! ## Environment Variables
//! | Variable              | Meaning                         | Default     |
//! |-----------------------|---------------------------------|-------------|
//! | `MC_RCON_HOST`        | server hostname                 | `127.0.0.1` |
//! | `MC_RCON_PORT`        | server TCP port                 | `25575`     |
//! | `MC_RCON_PASSWORD`    | shared RCON password (required) | —           |
//! | `MC_RCON_DEFAULT_OP`  | fallback operator name          | unset       |
//! | `MC_RCON_TIMEOUT_MS`  | connect/command deadline        | `5000`      |

use crate::error::{RconError, Result};
use crate::utils::timeout::DEFAULT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default RCON port for Minecraft-compatible servers.
pub const DEFAULT_PORT: u16 = 25575;

/// Connection parameters for a single RCON endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RconConfig {
    /// Server hostname or IP address.
    pub host: String,

    /// Server TCP port.
    pub port: u16,

    /// Shared authentication password.
    pub password: String,

    /// Operator name `execute_as_op` falls back to when the caller does
    /// not name one explicitly.
    #[serde(default)]
    pub default_op: Option<String>,

    /// Deadline applied to the TCP connect, the handshake, and each
    /// individual command.
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: DEFAULT_PORT,
            password: String::new(),
            default_op: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RconConfig {
    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("MC_RCON_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("MC_RCON_PORT") {
            config.port = port.parse::<u16>().map_err(|_| {
                RconError::Config(format!("Invalid MC_RCON_PORT value: '{port}'"))
            })?;
        }

        if let Ok(password) = std::env::var("MC_RCON_PASSWORD") {
            config.password = password;
        }

        if let Ok(op) = std::env::var("MC_RCON_DEFAULT_OP") {
            if !op.is_empty() {
                config.default_op = Some(op);
            }
        }

        if let Ok(timeout) = std::env::var("MC_RCON_TIMEOUT_MS") {
            let ms = timeout.parse::<u64>().map_err(|_| {
                RconError::Config(format!("Invalid MC_RCON_TIMEOUT_MS value: '{timeout}'"))
            })?;
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| RconError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RconError::Config(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Apply overrides to the default configuration.
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.password.is_empty() {
            errors.push("Password cannot be empty (set MC_RCON_PASSWORD)".to_string());
        }

        if self.timeout.as_millis() < 100 {
            errors.push("Timeout too short (minimum: 100ms)".to_string());
        } else if self.timeout.as_secs() > 300 {
            errors.push("Timeout too long (maximum: 300s)".to_string());
        }

        if let Some(ref op) = self.default_op {
            if op.trim().is_empty() {
                errors.push("Default operator name cannot be blank".to_string());
            }
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RconError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }

    /// `host:port` form used for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Helper module for Duration serialization/deserialization (milliseconds).
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
