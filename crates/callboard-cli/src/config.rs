//! Configuration management for Callboard CLI
//!
//! Stores property details, reset timing and paths in ~/.config/callboard/config.toml

use anyhow::{bail, Context, Result};
use callboard::ResetPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "callboard";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "store.json";

pub const ENV_DATA_DIR: &str = "CALLBOARD_DATA_DIR";
pub const ENV_RESET_HOUR: &str = "CALLBOARD_RESET_HOUR";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_property_name")]
    pub property_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,
    #[serde(default = "default_reset_check_interval_secs")]
    pub reset_check_interval_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// TOML menu replacing the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_property_name() -> String {
    "Crystal Plaza Al Majaz Hotel".to_string()
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_reset_hour() -> u32 {
    callboard::application::DEFAULT_RESET_HOUR
}

fn default_reset_check_interval_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            property_name: default_property_name(),
            currency: default_currency(),
            reset_hour: default_reset_hour(),
            reset_check_interval_secs: default_reset_check_interval_secs(),
            data_dir: None,
            catalog_path: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file (or defaults), apply environment overrides, validate
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read one config file without overrides or validation
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Apply `CALLBOARD_*` overrides read through `var`
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = var(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(hour) = var(ENV_RESET_HOUR) {
            self.reset_hour = hour
                .trim()
                .parse()
                .with_context(|| format!("{} must be an hour (0-23), got '{}'", ENV_RESET_HOUR, hour))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.property_name.trim().is_empty() {
            bail!("property_name must not be empty");
        }
        if self.currency.trim().is_empty() {
            bail!("currency must not be empty");
        }
        if self.reset_hour > 23 {
            bail!("reset_hour must be between 0 and 23, got {}", self.reset_hour);
        }
        if !(1..=3600).contains(&self.reset_check_interval_secs) {
            bail!(
                "reset_check_interval_secs must be between 1 and 3600, got {}",
                self.reset_check_interval_secs
            );
        }
        Ok(())
    }

    /// Directory holding the record store
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .context("Could not determine data directory")?
                .join(CONFIG_DIR)),
        }
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORE_FILE))
    }

    pub fn reset_policy(&self) -> Result<ResetPolicy> {
        Ok(ResetPolicy::new(self.reset_hour)?)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.reset_check_interval_secs)
    }

    /// Amount with the currency suffix, e.g. `65 AED`
    pub fn money(&self, amount: u64) -> String {
        format!("{} {}", amount, self.currency)
    }
}
