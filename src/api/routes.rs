//! API route definitions
//!
//! - /api/dashboard-data - Summary, alerts and alert panel text
//! - /api/series - Chart series
//! - /health - Liveness probe

use axum::{routing::get, Router};

use super::handlers::{self, DashboardState};

/// JSON routes, mounted under `/api`.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard-data", get(handlers::get_dashboard_data))
        .route("/series", get(handlers::get_series))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health_check))
}
