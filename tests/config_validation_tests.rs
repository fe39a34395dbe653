//! Config Validation Tests
//!
//! Typo detection and range validation for `redmeter.toml`, exercised
//! independently from the HTTP layer.

use redmeter::config::validation::{known_config_keys, suggest_correction, validate_unknown_keys};
use redmeter::config::{ConfigError, DashboardConfig};
use redmeter::types::ClassifierMode;
use std::io::Write;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_limits_warns_with_suggestion() {
    let toml_str = r#"
[classifier.limits]
presure_min = 0.2
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("presure_min"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("classifier.limits.pressure_min")
    );
}

#[test]
fn unknown_section_warns_without_breaking_load() {
    let toml_str = r#"
[dashboard]
title = "Red Meters"

[classifier]
mode = "regression"
"#;
    assert!(!validate_unknown_keys(toml_str).is_empty());
    let config = DashboardConfig::from_toml_str(toml_str).unwrap();
    assert_eq!(config.classifier.mode, ClassifierMode::Regression);
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[data]
path = "June18-21_data.csv"

[server]
addr = "127.0.0.1:5050"

[classifier]
mode = "threshold"
residual_sigma = 2.5

[classifier.limits]
pressure_min = 0.1
pressure_max = 20.0
temperature_min = 20.0
temperature_max = 35.0
dv_min = -500.0
dv_max = 500.0

[summary]
alert_limit = 10
message_limit = 5

[series]
sample_size = 200
seed = 42
marker_limit = 20
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn far_off_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("classifier.zzzzzzzzzzzz", &known), None);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn defaults_validate() {
    DashboardConfig::default().validate().unwrap();
}

#[test]
fn inverted_limits_fail_validation() {
    let toml_str = r#"
[classifier.limits]
temperature_min = 40.0
temperature_max = 30.0
"#;
    match DashboardConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("classifier.limits.temperature"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn non_positive_sigma_and_zero_limits_are_reported_together() {
    let mut config = DashboardConfig::default();
    config.classifier.residual_sigma = 0.0;
    config.summary.alert_limit = 0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn bad_mode_is_parse_error_with_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[classifier]\nmode = \"quantum\"").unwrap();
    let err = DashboardConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn partial_file_keeps_defaults() {
    let config = DashboardConfig::from_toml_str("[series]\nseed = 7\n").unwrap();
    assert_eq!(config.series.seed, 7);
    assert_eq!(config.series.sample_size, 200);
    assert_eq!(config.classifier.limits.dv_max, 500.0);
    assert_eq!(config.server.addr, "0.0.0.0:5000");
}
