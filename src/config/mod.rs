//! Dashboard Configuration Module
//!
//! Per-deployment configuration loaded from TOML, turning the classification
//! limits into operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `REDMETER_CONFIG` environment variable (path to TOML file)
//! 2. `redmeter.toml` in the current working directory
//! 3. Built-in defaults (identical to the fixed classification rules)
//!
//! `REDMETER_SERVER_ADDR` / `REDMETER_DATA` and the CLI flags are applied on
//! top. The resolved config is handed to the router as immutable state; there
//! is no global.

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;
