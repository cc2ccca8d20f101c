//! Host configuration
//!
//! Defaults, then environment (`SNAPBANK_DATA_DIR`,
//! `SNAPBANK_ALLOW_ZERO_TRANSFERS`), then command-line flags.

use serde::{Deserialize, Serialize};
use snapbank_ledger::TransferPolicy;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "SNAPBANK_DATA_DIR";
pub const ENV_ALLOW_ZERO_TRANSFERS: &str = "SNAPBANK_ALLOW_ZERO_TRANSFERS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: expected true or false")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} cannot be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Root directory; each manager journals under its own subdirectory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub transfer: TransferPolicy,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            transfer: TransferPolicy::default(),
        }
    }
}

impl HostConfig {
    /// Defaults overridden from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup` (an environment-like source)
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if dir.trim().is_empty() {
                return Err(ConfigError::Empty { var: ENV_DATA_DIR });
            }
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_ALLOW_ZERO_TRANSFERS) {
            self.transfer.allow_zero_amount = parse_bool(ENV_ALLOW_ZERO_TRANSFERS, &value)?;
        }
        Ok(self)
    }

    pub fn accounts_dir(&self) -> PathBuf {
        self.data_dir.join("accounts")
    }

    pub fn persons_dir(&self) -> PathBuf {
        self.data_dir.join("persons")
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.data_dir.join("cards")
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
