//! Configuration management
//!
//! Analysis defaults (confidence level, significance level, bootstrap and
//! sampling sizes, seeds, outlier rule, log level) can come from:
//! - built-in defaults
//! - YAML/TOML configuration files
//! - environment variables
//!
//! Later sources override earlier ones, and the merged result is validated.

use crate::error::{Error, Result};
use crate::stats::OutlierMethod;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Confidence intervals and hypothesis tests
    pub inference: InferenceConfig,
    /// Bootstrap resampling
    pub bootstrap: BootstrapConfig,
    /// Sampling-distribution simulation
    pub sampling: SamplingConfig,
    /// Outlier detection
    pub outliers: OutlierConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Inference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Confidence level for intervals, in (0, 1)
    pub confidence_level: f64,
    /// Significance level for t-tests, in (0, 1)
    pub alpha: f64,
}

/// Bootstrap settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of resamples
    pub resamples: usize,
    /// Fixed seed; `None` draws a fresh one per run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Use the rayon-backed resampler when the `parallel` feature is on
    pub parallel: bool,
}

/// Sampling-distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Number of samples drawn from the population
    pub num_samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Outlier detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub method: OutlierMethod,
    /// IQR fence multiplier
    pub threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (off, error, warn, info, debug, trace)
    pub level: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            alpha: 0.05,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: 10_000,
            seed: None,
            parallel: false,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            seed: None,
        }
    }
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            method: OutlierMethod::Iqr,
            threshold: 1.5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Map the configured level onto a `log::LevelFilter`
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(self.level.trim()).map_err(|_| {
            Error::ConfigurationError(format!(
                "Invalid log level '{}'. Valid levels: off, error, warn, info, debug, trace",
                self.level
            ))
        })
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    /// Load configuration from a file (YAML or TOML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// Load configuration with precedence: defaults -> file -> env
    pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        loader::load_with_precedence(config_file)
    }

    /// Discover a configuration file in the standard locations and load it
    pub fn auto_load() -> Result<Self> {
        loader::auto_load()
    }

    /// Validate configuration and return errors if invalid
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path.as_ref())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }

    /// Set both the bootstrap and the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bootstrap.seed = Some(seed);
        self.sampling.seed = Some(seed);
        self
    }
}
