mod invoke;
mod log;
mod server;

pub use invoke::*;
pub use log::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// How to launch the external tool server.
    #[serde(default)]
    pub server: ServerLaunchConfig,
    /// Per-invocation behaviour of the client.
    #[serde(default)]
    pub invoke: InvokeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Parse a TOML document. Missing sections fall back to their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Render the resolved configuration (defaults included) as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.server.validate() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.command".into(),
                message: e.to_string(),
            });
        }

        if let Some(cwd) = &self.server.cwd {
            if !cwd.is_dir() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Warning,
                    field: "server.cwd".into(),
                    message: format!("{} is not a directory", cwd.display()),
                });
            }
        }

        if self.invoke.response_timeout_ms == Some(0) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "invoke.response_timeout_ms".into(),
                message: "timeout must be greater than 0 (omit it to wait forever)".into(),
            });
        }

        if self.log.filter.trim().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "log.filter".into(),
                message: "empty filter, falling back to \"warn\"".into(),
            });
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
