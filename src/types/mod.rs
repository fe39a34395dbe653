//! Shared data structures for the sensor trouble dashboard
//!
//! This module defines the core types flowing through the request pipeline:
//! - Load: `Reading`, `Dataset` (one CSV row each, source order)
//! - Flag: `TroubleType`, `Trouble` (classifier output)
//! - Summarize: `DashboardStatus` (NORMAL / ATTENTION / TROUBLE)
//! - Mode: `ClassifierMode` (threshold-only vs regression-residual)

mod reading;
mod trouble;
mod status;
pub mod timestamp;

pub use reading::*;
pub use trouble::*;
pub use status::*;
