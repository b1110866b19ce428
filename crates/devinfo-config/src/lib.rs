//! Configuration management for the device info host
//!
//! Selects the system info provider and its sysfs paths, and the default log
//! level. Config files are TOML; every field has a default so an empty file
//! (or no file at all) is valid.

use devinfo_hal::mock::{MockProfile, MockProvider};
use devinfo_hal::sysfs::default_model_sources;
use devinfo_hal::{ModelSource, SysfsConfig, SysfsProvider, SystemInfoProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/devinfo";
pub const CONFIG_FILE: &str = "config.toml";

/// Which provider backs the bridge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Sysfs,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default = "default_power_supply_dir")]
    pub power_supply_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_name: Option<String>,

    /// Profile name used when `kind = "mock"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_profile: Option<String>,

    #[serde(default = "default_model_sources")]
    pub model_sources: Vec<ModelSource>,
}

fn default_power_supply_dir() -> PathBuf {
    SysfsConfig::default().power_supply_dir
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            power_supply_dir: default_power_supply_dir(),
            battery_name: None,
            mock_profile: None,
            model_sources: default_model_sources(),
        }
    }
}

impl ProviderConfig {
    /// Sysfs settings derived from this configuration
    pub fn sysfs_config(&self) -> SysfsConfig {
        SysfsConfig {
            power_supply_dir: self.power_supply_dir.clone(),
            battery_name: self.battery_name.clone(),
            model_sources: self.model_sources.clone(),
        }
    }

    /// Instantiate the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn SystemInfoProvider>, ConfigError> {
        match self.kind {
            ProviderKind::Sysfs => Ok(Arc::new(SysfsProvider::with_config(self.sysfs_config()))),
            ProviderKind::Mock => match &self.mock_profile {
                Some(name) => {
                    let profile = MockProfile::from_name(name).ok_or_else(|| {
                        ConfigError::Invalid(format!("unknown mock profile: {}", name))
                    })?;
                    Ok(Arc::new(MockProvider::new(profile)))
                }
                None => Ok(Arc::new(MockProvider::from_env())),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevInfoConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DevInfoConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the first existing file among `candidates`.
    ///
    /// Returns `None` when none of them exist.
    pub fn load_first(candidates: &[PathBuf]) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        for path in candidates {
            if path.exists() {
                return Ok(Some((Self::load(path)?, path.clone())));
            }
        }
        Ok(None)
    }

    /// Load configuration from default locations, user config first
    pub fn load_default() -> Result<Option<(Self, PathBuf)>, ConfigError> {
        Self::load_first(&default_config_paths())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Default lookup order: user config, then system config
pub fn default_config_paths() -> Vec<PathBuf> {
    user_config_path()
        .into_iter()
        .chain(std::iter::once(Path::new(CONFIG_DIR).join(CONFIG_FILE)))
        .collect()
}

/// `$XDG_CONFIG_HOME/devinfo/config.toml`, falling back to `~/.config`
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("devinfo").join(CONFIG_FILE))
}
