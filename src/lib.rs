//! redmeter: Sensor Trouble Dashboard
//!
//! Loads timestamped pressure / temperature / DV readings from CSV, flags
//! troubled readings and serves a summary over HTTP.
//!
//! ## Pipeline
//!
//! - **Acquisition**: CSV → `Dataset`, dropping rows with null fields
//! - **Classifier**: threshold rules or an OLS residual baseline
//! - **Summary**: status, rate, per-type counts, averages, alert text
//! - **Series**: seeded sample of readings for client-side charts
//! - **API**: axum router, one fresh computation per request

pub mod acquisition;
pub mod api;
pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod series;
pub mod summary;
pub mod types;

// Re-export configuration
pub use config::DashboardConfig;

// Re-export commonly used types
pub use types::{ClassifierMode, DashboardStatus, Dataset, Reading, Trouble, TroubleType};

// Re-export pipeline entry points
pub use acquisition::{load_csv, LoadError};
pub use classifier::{Classifier, Detection, LinearModel};
pub use dashboard::{build_dashboard, build_series, Analysis, DashboardData};
pub use series::Series;
pub use summary::Summary;
