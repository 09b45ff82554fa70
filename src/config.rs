//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is a
//! valid configuration. Environment variables are applied on top of the
//! defaults by `from_env`.

use crate::error::{Error, Result};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Points at a TOML file to load instead of reading the environment.
pub const CONFIG_PATH_VAR: &str = "BANK_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed deposit for the savings account every new customer gets.
    pub opening_deposit: Decimal,
    pub log: LogConfig,
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is not set.
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Where the batch driver's simulated clock starts. Defaults to the time
    /// the run starts.
    pub epoch: Option<DateTime<Utc>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opening_deposit: dec!(10.00),
            log: LogConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Defaults, overridden by `BANK_OPENING_DEPOSIT`, `BANK_LOG` and
    /// `BANK_LOG_JSON`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// The file named by `BANK_CONFIG` if set, the environment otherwise.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Self::from_env(),
        }
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(deposit) = var("BANK_OPENING_DEPOSIT") {
            config.opening_deposit = Decimal::from_str(deposit.trim())
                .map_err(|e| Error::Config(format!("BANK_OPENING_DEPOSIT: {}", e)))?;
        }

        if let Some(filter) = var("BANK_LOG") {
            config.log.filter = filter;
        }

        if let Some(json) = var("BANK_LOG_JSON") {
            config.log.json = match json.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                other => {
                    return Err(Error::Config(format!("BANK_LOG_JSON: not a boolean: {}", other)))
                }
            };
        }

        Ok(config)
    }
}
