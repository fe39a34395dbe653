//! API route handlers
//!
//! - Dashboard summary and chart series (recomputed per request)
//! - Liveness probe

mod dashboard;
mod health;

pub use dashboard::*;
pub use health::*;

use std::sync::Arc;

use crate::config::DashboardConfig;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers. Configuration is read-only after startup.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub config: Arc<DashboardConfig>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
