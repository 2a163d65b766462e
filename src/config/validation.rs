//! Configuration validation utilities
//!
//! Checks every section of an [`AnalysisConfig`] so bad values are reported
//! when the configuration is loaded rather than in the middle of an analysis.

use super::*;
use crate::error::{Error, Result};
use log::warn;

/// Validate the entire configuration
pub fn validate_config(config: &AnalysisConfig) -> Result<()> {
    validate_inference_config(&config.inference)?;
    validate_bootstrap_config(&config.bootstrap)?;
    validate_sampling_config(&config.sampling)?;
    validate_outlier_config(&config.outliers)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

fn check_open_unit(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(Error::ConfigurationError(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate inference configuration
pub fn validate_inference_config(config: &InferenceConfig) -> Result<()> {
    check_open_unit("confidence_level", config.confidence_level)?;
    check_open_unit("alpha", config.alpha)?;

    if (config.confidence_level + config.alpha - 1.0).abs() > 1e-9 {
        warn!(
            "confidence_level {} and alpha {} do not describe the same error rate",
            config.confidence_level, config.alpha
        );
    }

    Ok(())
}

/// Validate bootstrap configuration
pub fn validate_bootstrap_config(config: &BootstrapConfig) -> Result<()> {
    if config.resamples == 0 {
        return Err(Error::ConfigurationError(
            "bootstrap.resamples must be greater than 0".to_string(),
        ));
    }

    if config.resamples < 1000 {
        warn!(
            "bootstrap.resamples = {} is low; percentile bounds will be noisy",
            config.resamples
        );
    }

    if config.parallel && cfg!(not(feature = "parallel")) {
        warn!("bootstrap.parallel is set but the crate was built without the `parallel` feature");
    }

    Ok(())
}

/// Validate sampling configuration
pub fn validate_sampling_config(config: &SamplingConfig) -> Result<()> {
    if config.num_samples == 0 {
        return Err(Error::ConfigurationError(
            "sampling.num_samples must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validate outlier configuration
pub fn validate_outlier_config(config: &OutlierConfig) -> Result<()> {
    if !(config.threshold.is_finite() && config.threshold >= 0.0) {
        return Err(Error::ConfigurationError(format!(
            "outliers.threshold must be a non-negative number, got {}",
            config.threshold
        )));
    }
    Ok(())
}

/// Validate logging configuration
pub fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    config.level_filter().map(|_| ())
}
