//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::currency::CurrencySettings;
use crate::layout::DashboardLayout;
use crate::state::{StorageKeys, DEFAULT_KEY_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub layout: DashboardLayout,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persisted view state configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Prefix of the persisted keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// State file used by the command-line tool
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_state_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("planfact").join("state.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./planfact_state.json".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            state_file: default_state_file(),
        }
    }
}

impl StorageConfig {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}

/// Export link configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_param")]
    pub param: String,

    #[serde(default = "default_export_value")]
    pub value: String,
}

fn default_export_param() -> String {
    "currency".to_string()
}

fn default_export_value() -> String {
    "USD".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            param: default_export_param(),
            value: default_export_value(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("planfact").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for chart in &self.layout.charts {
            if !seen.insert(chart.slot.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate chart slot '{}'",
                    chart.slot
                )));
            }
            if let Some(tab) = &chart.tab {
                if !self.layout.has_tab(tab) {
                    return Err(ConfigError::Invalid(format!(
                        "chart slot '{}' refers to unknown tab '{}'",
                        chart.slot, tab
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(rate) = std::env::var("PLANFACT_FALLBACK_RATE") {
            if let Ok(r) = rate.parse() {
                self.currency.fallback_rate = Some(r);
            }
        }

        if let Ok(prefix) = std::env::var("PLANFACT_STORAGE_PREFIX") {
            self.storage.key_prefix = prefix;
        }
        if let Ok(path) = std::env::var("PLANFACT_STATE_FILE") {
            self.storage.state_file = path;
        }

        if let Ok(level) = std::env::var("PLANFACT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PLANFACT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Planfact Configuration
#
# Environment variables override these settings:
# - PLANFACT_FALLBACK_RATE
# - PLANFACT_STORAGE_PREFIX
# - PLANFACT_STATE_FILE
# - PLANFACT_LOG_LEVEL
# - PLANFACT_LOG_FORMAT

[currency]
# Base currency code, shown after local amounts
base_code = "UZS"

# Secondary currency code and its leading marker
secondary_code = "USD"
secondary_symbol = "$"

# Number formatting locales
base_locale = "ru-RU"
secondary_locale = "en-US"

# Exchange rate used when a payload carries none (rates <= 1 disable USD)
# fallback_rate = 12650.0

[storage]
# Prefix of the persisted currency/tab keys
key_prefix = "planFactReport_"

[export]
# Query parameter appended to export links in USD mode
param = "currency"
value = "USD"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Omit [layout] to use the built-in project dashboard. Example:
#
# [[layout.tabs]]
# id = "#performance"
# default = true
#
# [[layout.charts]]
# slot = "performanceChartVolume"
# tab = "#performance"
# kind = "bar"
# currency = true
#
# [layout.charts.source]
# from = "performance"
#
# [[layout.charts.source.series]]
# key = "plan_volume"
# label = "План"
#
# [[layout.charts.source.series]]
# key = "fact_volume"
# label = "Факт"
"##
    .to_string()
}
