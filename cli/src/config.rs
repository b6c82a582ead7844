//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};

use mintcap_ledger::GenesisConfig;
use mintcap_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for the `mintcap` tool.
///
/// Loaded from a TOML file via [`CliConfig::from_toml_file`]; CLI flags and
/// environment variables override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the ledger snapshot is kept between invocations.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Construction-time parameters used by `init`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis: Option<GenesisConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_path() -> PathBuf {
    PathBuf::from("./mintcap_state.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            genesis: None,
        }
    }
}
