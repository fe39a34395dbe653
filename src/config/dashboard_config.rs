//! Dashboard Configuration - classifier limits and I/O settings as TOML values
//!
//! Every classification limit and output size is a field here. Each struct
//! implements `Default` with the constants from `defaults.rs`, so a missing or
//! empty config file reproduces the fixed rules exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::types::ClassifierMode;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "REDMETER_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "redmeter.toml";

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$REDMETER_CONFIG`
/// 2. `./redmeter.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Sensor CSV location
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier mode and limits
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Summary sizing
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Chart series sampling
    #[serde(default)]
    pub series: SeriesConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    /// 1. `$REDMETER_CONFIG` environment variable
    /// 2. `./redmeter.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A file that fails to load is logged and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), mode = %config.classifier.mode, "Loaded dashboard config from REDMETER_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from REDMETER_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "REDMETER_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(mode = %config.classifier.mode, "Loaded dashboard config from ./redmeter.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./redmeter.toml, using defaults");
                }
            }
        }

        info!("No redmeter.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `REDMETER_SERVER_ADDR` and `REDMETER_DATA` on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("REDMETER_SERVER_ADDR") {
            if !addr.trim().is_empty() {
                self.server.addr = addr;
            }
        }
        if let Ok(path) = std::env::var("REDMETER_DATA") {
            if !path.trim().is_empty() {
                self.data.path = PathBuf::from(path);
            }
        }
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Every lower limit must be finite and strictly below its upper limit
    /// - The residual sigma multiplier must be finite and positive
    /// - Alert, message and sample sizes must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.classifier.limits;
        let mut errors: Vec<String> = Vec::new();

        Self::check_range(l.pressure_min, l.pressure_max, "classifier.limits.pressure", &mut errors);
        Self::check_range(
            l.temperature_min,
            l.temperature_max,
            "classifier.limits.temperature",
            &mut errors,
        );
        Self::check_range(l.dv_min, l.dv_max, "classifier.limits.dv", &mut errors);

        let sigma = self.classifier.residual_sigma;
        if !sigma.is_finite() || sigma <= 0.0 {
            errors.push(format!(
                "classifier.residual_sigma: must be a positive finite number (got {sigma})"
            ));
        }

        if self.summary.alert_limit == 0 {
            errors.push("summary.alert_limit: must be > 0".to_string());
        }
        if self.summary.message_limit == 0 {
            errors.push("summary.message_limit: must be > 0".to_string());
        }
        if self.series.sample_size == 0 {
            errors.push("series.sample_size: must be > 0".to_string());
        }
        if self.server.addr.trim().is_empty() {
            errors.push("server.addr: must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_range(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, catch them explicitly
        if !min.is_finite() || !max.is_finite() {
            errors.push(format!("{name}: values must be finite (got min={min}, max={max})"));
            return;
        }
        if min >= max {
            errors.push(format!("{name}: min ({min:.3}) must be < max ({max:.3})"));
        }
    }
}

// ============================================================================
// Data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Sensor CSV, re-read on every request.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(defaults::DATA_PATH)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `REDMETER_SERVER_ADDR` or the `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// `threshold` or `regression`.
    #[serde(default)]
    pub mode: ClassifierMode,

    /// Residual magnitude, in residual standard deviations, that marks a
    /// reading as `HIGH_ANOMALY` (regression mode only).
    #[serde(default = "default_residual_sigma")]
    pub residual_sigma: f64,

    /// Raw limits shared by both modes.
    #[serde(default)]
    pub limits: ThresholdLimits,
}

fn default_residual_sigma() -> f64 { defaults::RESIDUAL_SIGMA }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: ClassifierMode::default(),
            residual_sigma: default_residual_sigma(),
            limits: ThresholdLimits::default(),
        }
    }
}

/// Raw sensor limits. A value strictly outside `[min, max]` is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLimits {
    #[serde(default = "default_pressure_min")]
    pub pressure_min: f64,
    #[serde(default = "default_pressure_max")]
    pub pressure_max: f64,
    /// °C
    #[serde(default = "default_temperature_min")]
    pub temperature_min: f64,
    /// °C
    #[serde(default = "default_temperature_max")]
    pub temperature_max: f64,
    #[serde(default = "default_dv_min")]
    pub dv_min: f64,
    #[serde(default = "default_dv_max")]
    pub dv_max: f64,
}

fn default_pressure_min() -> f64 { defaults::PRESSURE_MIN }
fn default_pressure_max() -> f64 { defaults::PRESSURE_MAX }
fn default_temperature_min() -> f64 { defaults::TEMPERATURE_MIN }
fn default_temperature_max() -> f64 { defaults::TEMPERATURE_MAX }
fn default_dv_min() -> f64 { defaults::DV_MIN }
fn default_dv_max() -> f64 { defaults::DV_MAX }

impl Default for ThresholdLimits {
    fn default() -> Self {
        Self {
            pressure_min: default_pressure_min(),
            pressure_max: default_pressure_max(),
            temperature_min: default_temperature_min(),
            temperature_max: default_temperature_max(),
            dv_min: default_dv_min(),
            dv_max: default_dv_max(),
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Troubles returned in `alerts`.
    #[serde(default = "default_alert_limit")]
    pub alert_limit: usize,

    /// Troubles turned into alert message lines.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

fn default_alert_limit() -> usize { defaults::ALERT_LIMIT }
fn default_message_limit() -> usize { defaults::MESSAGE_LIMIT }

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            alert_limit: default_alert_limit(),
            message_limit: default_message_limit(),
        }
    }
}

// ============================================================================
// Series
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Readings sampled for the charts.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Sampler seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Troubles overlaid as markers.
    #[serde(default = "default_marker_limit")]
    pub marker_limit: usize,
}

fn default_sample_size() -> usize { defaults::SERIES_SAMPLE_SIZE }
fn default_seed() -> u64 { defaults::SERIES_SEED }
fn default_marker_limit() -> usize { defaults::SERIES_MARKER_LIMIT }

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            seed: default_seed(),
            marker_limit: default_marker_limit(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config = DashboardConfig::from_toml_str("").expect("empty TOML should parse");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.classifier.limits.pressure_min, 0.1);
        assert_eq!(config.classifier.limits.dv_max, 500.0);
        assert_eq!(config.summary.alert_limit, 10);
        assert_eq!(config.series.seed, 42);
        assert_eq!(config.classifier.mode, ClassifierMode::Threshold);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[data]
path = "June18-21_data.csv"

[classifier]
mode = "regression"

[classifier.limits]
temperature_max = 40.0
"#;
        let config = DashboardConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.data.path, PathBuf::from("June18-21_data.csv"));
        assert_eq!(config.classifier.mode, ClassifierMode::Regression);
        assert_eq!(config.classifier.limits.temperature_max, 40.0);
        // Non-overridden values retain defaults
        assert_eq!(config.classifier.limits.temperature_min, 20.0);
        assert_eq!(config.classifier.residual_sigma, 2.0);
    }

    #[test]
    fn test_validation_catches_inverted_limits() {
        let mut config = DashboardConfig::default();
        config.classifier.limits.pressure_min = 30.0;
        config.classifier.limits.pressure_max = 20.0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("classifier.limits.pressure")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_catches_bad_sigma_and_limits() {
        let mut config = DashboardConfig::default();
        config.classifier.residual_sigma = f64::NAN;
        config.summary.alert_limit = 0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_mode_is_parse_error() {
        let result = DashboardConfig::from_toml_str("[classifier]\nmode = \"neural\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(..))));
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut original = DashboardConfig::default();
        original.classifier.mode = ClassifierMode::Regression;
        let toml_str = original.to_toml().expect("serialization should work");
        assert!(toml_str.contains("[classifier.limits]"));
        let roundtripped = DashboardConfig::from_toml_str(&toml_str).expect("deserialization should work");
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[summary]\nalert_limit = 3").unwrap();
        let config = DashboardConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.summary.alert_limit, 3);

        let missing = DashboardConfig::load_from_file(Path::new("/nonexistent/redmeter.toml"));
        match missing {
            Err(e @ ConfigError::Io(..)) => assert!(e.to_string().contains("/nonexistent/redmeter.toml")),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
