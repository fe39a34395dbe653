//! System-wide default constants.
//!
//! Every tunable in `DashboardConfig` defaults to one of these values, so a
//! deployment with no config file behaves exactly like the fixed rules.

// ============================================================================
// Data
// ============================================================================

/// Sensor CSV read on every request when nothing else is configured.
pub const DATA_PATH: &str = "data/readings.csv";

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:5000";

// ============================================================================
// Threshold Limits
// ============================================================================

/// Pressure strictly below this is a pressure issue.
pub const PRESSURE_MIN: f64 = 0.1;

/// Pressure strictly above this is a pressure issue.
pub const PRESSURE_MAX: f64 = 20.0;

/// Temperature (°C) strictly below this is a temperature issue.
pub const TEMPERATURE_MIN: f64 = 20.0;

/// Temperature (°C) strictly above this is a temperature issue.
pub const TEMPERATURE_MAX: f64 = 35.0;

/// DV strictly below this is extreme.
pub const DV_MIN: f64 = -500.0;

/// DV strictly above this is extreme.
pub const DV_MAX: f64 = 500.0;

// ============================================================================
// Regression
// ============================================================================

/// Residuals beyond this many standard deviations are `HIGH_ANOMALY`.
pub const RESIDUAL_SIGMA: f64 = 2.0;

// ============================================================================
// Summary
// ============================================================================

/// Troubles returned in the `alerts` array.
pub const ALERT_LIMIT: usize = 10;

/// Troubles rendered as human-readable alert lines.
pub const MESSAGE_LIMIT: usize = 5;

// ============================================================================
// Chart Series
// ============================================================================

/// Readings sampled for the chart series.
pub const SERIES_SAMPLE_SIZE: usize = 200;

/// Seed for the series sampler, fixed so the charts are stable between requests.
pub const SERIES_SEED: u64 = 42;

/// Troubles overlaid on the DV chart.
pub const SERIES_MARKER_LIMIT: usize = 20;
