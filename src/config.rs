//! Configuration loaded from TOML
//!
//! Every field has a default, so an absent file or a partial file is valid.
//! Lookup order: explicit path, then `<config_home>/scorecard/config.toml`,
//! then built-in defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::utils::Precision;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub precision: Precision,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `path` is None.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.precision.decimals > Precision::MAX_DECIMALS {
            bail!(
                "precision.decimals must be <= {}, got {}",
                Precision::MAX_DECIMALS,
                self.precision.decimals
            );
        }
        Ok(())
    }
}

/// `<config_home>/scorecard/config.toml`, if a config directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("scorecard").join("config.toml"))
}
