//! Engine settings loaded from TOML.
//!
//! Every key is optional; anything omitted takes the value shipped in
//! `config/default.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ModelTier;

/// The default configuration, embedded at compile time.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading a [`TrendConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config value for '{key}': {message}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Settings for the tree ensemble used by [`ModelTier::Advanced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Number of bagged trees.
    pub trees: usize,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// RNG seed for bootstrap sampling.
    pub seed: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 8,
            seed: 42,
        }
    }
}

/// Thresholds that turn analysis results into alert events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Mean concentration above which a region raises a threshold alert.
    pub concentration: f64,
    /// Hotspot count above which a region is flagged.
    pub hotspot_count: usize,
    /// Forecast percentage increase above which a trend alert fires.
    pub trend_increase: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            concentration: 100.0,
            hotspot_count: 5,
            trend_increase: 15.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Years to project forward.
    pub horizon: u32,
    /// Default regression tier.
    pub model: ModelTier,
    /// Concentration above which samples count toward hotspots.
    pub hotspot_threshold: f64,
    /// Tree ensemble settings.
    pub ensemble: EnsembleConfig,
    /// Alert thresholds.
    pub alerts: AlertThresholds,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            horizon: 2,
            model: ModelTier::Simple,
            hotspot_threshold: 100.0,
            ensemble: EnsembleConfig::default(),
            alerts: AlertThresholds::default(),
        }
    }
}

impl TrendConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// * If the text is not valid TOML for this schema
    /// * If `horizon`, `ensemble.trees` or `ensemble.max_depth` is zero
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the contents fail [`Self::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded trend config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zero = |key| ConfigError::Invalid {
            key,
            message: "must be greater than zero".to_string(),
        };
        if self.horizon == 0 {
            return Err(zero("horizon"));
        }
        if self.ensemble.trees == 0 {
            return Err(zero("ensemble.trees"));
        }
        if self.ensemble.max_depth == 0 {
            return Err(zero("ensemble.max_depth"));
        }
        Ok(())
    }
}
