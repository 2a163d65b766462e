//! Configuration loading utilities
//!
//! This module handles loading configuration from various sources with proper
//! precedence and validation.

use super::*;
use crate::error::{Error, Result};
use log::{debug, LevelFilter};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Read an environment variable and parse it, naming the variable on failure
fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::ConfigurationError(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to an existing configuration
pub fn apply_env_overrides(config: &mut AnalysisConfig) -> Result<()> {
    if let Some(level) = parse_env("EDA_CONFIDENCE_LEVEL")? {
        config.inference.confidence_level = level;
    }

    if let Some(alpha) = parse_env("EDA_ALPHA")? {
        config.inference.alpha = alpha;
    }

    if let Some(resamples) = parse_env("EDA_BOOTSTRAP_RESAMPLES")? {
        config.bootstrap.resamples = resamples;
    }

    if let Some(parallel) = parse_env("EDA_BOOTSTRAP_PARALLEL")? {
        config.bootstrap.parallel = parallel;
    }

    if let Some(seed) = parse_env::<u64>("EDA_SEED")? {
        config.bootstrap.seed = Some(seed);
        config.sampling.seed = Some(seed);
    }

    if let Some(num_samples) = parse_env("EDA_NUM_SAMPLES")? {
        config.sampling.num_samples = num_samples;
    }

    if let Some(method) = parse_env("EDA_OUTLIER_METHOD")? {
        config.outliers.method = method;
    }

    if let Some(threshold) = parse_env("EDA_OUTLIER_THRESHOLD")? {
        config.outliers.threshold = threshold;
    }

    // RUST_LOG may hold per-module directives; only a bare level is taken
    if let Ok(level) = env::var("EDA_LOG_LEVEL") {
        config.logging.level = level;
    } else if let Ok(level) = env::var("RUST_LOG") {
        if LevelFilter::from_str(level.trim()).is_ok() {
            config.logging.level = level;
        }
    }

    Ok(())
}

/// Load configuration from environment variables
pub fn load_from_env() -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<AnalysisConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<AnalysisConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
///
/// Fields missing from the file keep their defaults.
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<AnalysisConfig> {
    let mut config = match config_file {
        Some(path) => {
            debug!("loading configuration from {}", path.as_ref().display());
            load_from_file(path.as_ref())?
        }
        None => AnalysisConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    Ok(config)
}

/// Save configuration to a file
pub fn save_to_file(config: &AnalysisConfig, path: &Path) -> Result<()> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => config.to_yaml()?,
        Some("toml") => config.to_toml()?,
        Some(ext) => {
            return Err(Error::ConfigurationError(format!(
                "Unsupported config file format: {}",
                ext
            )))
        }
        None => config.to_yaml()?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, contents)?;
    Ok(())
}

/// Get configuration file paths in order of precedence
pub fn get_config_file_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![
        "retail-eda.yml".into(),
        "retail-eda.yaml".into(),
        "retail-eda.toml".into(),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("retail-eda");
        paths.push(app_dir.join("config.yml"));
        paths.push(app_dir.join("config.yaml"));
        paths.push(app_dir.join("config.toml"));
    }

    if let Ok(config_path) = env::var("EDA_CONFIG_FILE") {
        paths.insert(0, config_path.into());
    }

    paths
}

/// Auto-discover and load configuration file
pub fn auto_load() -> Result<AnalysisConfig> {
    // An explicitly named file must exist
    if let Ok(config_path) = env::var("EDA_CONFIG_FILE") {
        return load_with_precedence(Some(PathBuf::from(config_path)));
    }

    for path in get_config_file_paths() {
        if path.exists() {
            return load_with_precedence(Some(path));
        }
    }

    load_with_precedence::<&Path>(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Mutex to serialize tests that modify environment variables
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 10] = [
        "EDA_CONFIDENCE_LEVEL",
        "EDA_ALPHA",
        "EDA_BOOTSTRAP_RESAMPLES",
        "EDA_SEED",
        "EDA_BOOTSTRAP_PARALLEL",
        "EDA_NUM_SAMPLES",
        "EDA_OUTLIER_METHOD",
        "EDA_OUTLIER_THRESHOLD",
        "EDA_LOG_LEVEL",
        "EDA_CONFIG_FILE",
    ];

    /// Clears the EDA_* variables and restores them on drop
    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn new() -> Self {
            let saved = ENV_VARS.iter().map(|&k| (k, env::var(k).ok())).collect();
            for k in ENV_VARS {
                env::remove_var(k);
            }
            EnvGuard(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (k, v) in &self.0 {
                match v {
                    Some(v) => env::set_var(k, v),
                    None => env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn test_load_from_env() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        env::set_var("EDA_CONFIDENCE_LEVEL", "0.9");
        env::set_var("EDA_BOOTSTRAP_RESAMPLES", "2500");
        env::set_var("EDA_SEED", "7");
        env::set_var("EDA_OUTLIER_METHOD", "zscore");
        env::set_var("EDA_LOG_LEVEL", "debug");

        let config = load_from_env().unwrap();

        assert_eq!(config.inference.confidence_level, 0.9);
        assert_eq!(config.bootstrap.resamples, 2500);
        assert_eq!(config.bootstrap.seed, Some(7));
        assert_eq!(config.sampling.seed, Some(7));
        assert_eq!(config.outliers.method, OutlierMethod::ZScore);
        assert_eq!(config.logging.level, "debug");
        // Untouched values keep their defaults
        assert_eq!(config.inference.alpha, 0.05);
    }

    #[test]
    fn test_invalid_env_value() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        env::set_var("EDA_BOOTSTRAP_RESAMPLES", "lots");
        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("EDA_BOOTSTRAP_RESAMPLES"));
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
inference:
  confidence_level: 0.99
bootstrap:
  resamples: 500
  seed: 42
  parallel: true
outliers:
  method: zscore
"#;

        let config = load_from_yaml(yaml).unwrap();
        assert_eq!(config.inference.confidence_level, 0.99);
        assert_eq!(config.inference.alpha, 0.05);
        assert_eq!(config.bootstrap.resamples, 500);
        assert_eq!(config.bootstrap.seed, Some(42));
        assert!(config.bootstrap.parallel);
        assert_eq!(config.outliers.method, OutlierMethod::ZScore);
        assert_eq!(config.outliers.threshold, 1.5);
    }

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
[inference]
alpha = 0.01

[sampling]
num_samples = 250
seed = 3

[logging]
level = "warn"
"#;

        let config = load_from_toml(toml).unwrap();
        assert_eq!(config.inference.alpha, 0.01);
        assert_eq!(config.sampling.num_samples, 250);
        assert_eq!(config.sampling.seed, Some(3));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            load_from_yaml("inference: [unclosed"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig::default().with_seed(11);

        for name in ["config.yaml", "nested/config.toml"] {
            let path = dir.path().join(name);
            save_to_file(&config, &path).unwrap();
            assert_eq!(load_from_file(&path).unwrap(), config);
        }

        let bad = dir.path().join("config.ini");
        assert!(save_to_file(&config, &bad).is_err());
        assert!(load_from_file(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_precedence_env_over_file() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        let dir = tempdir().unwrap();
        let path = dir.path().join("retail-eda.yaml");
        fs::write(&path, "inference:\n  confidence_level: 0.9\n  alpha: 0.1\n").unwrap();

        env::set_var("EDA_ALPHA", "0.01");
        let config = load_with_precedence(Some(&path)).unwrap();

        // File beats defaults, env beats file
        assert_eq!(config.inference.confidence_level, 0.9);
        assert_eq!(config.inference.alpha, 0.01);
    }

    #[test]
    fn test_precedence_rejects_invalid_result() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        env::set_var("EDA_CONFIDENCE_LEVEL", "1.5");
        assert!(matches!(
            load_with_precedence::<&Path>(None),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_config_file_env_override() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[bootstrap]\nresamples = 123\n").unwrap();
        env::set_var("EDA_CONFIG_FILE", &path);

        let paths = get_config_file_paths();
        assert_eq!(paths[0], path);

        let config = auto_load().unwrap();
        assert_eq!(config.bootstrap.resamples, 123);
    }
}
