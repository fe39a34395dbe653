//! Dashboard data endpoints: summary and chart series

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::envelope::ApiError;
use crate::dashboard::{build_dashboard, build_series, DashboardData};
use crate::series::Series;

use super::DashboardState;

/// GET /api/dashboard-data - Status, counts, alerts and alert panel text
pub async fn get_dashboard_data(
    State(state): State<DashboardState>,
) -> Result<Json<DashboardData>, ApiError> {
    let config = Arc::clone(&state.config);
    // CSV load and classification are blocking work
    let data = tokio::task::spawn_blocking(move || build_dashboard(&config)).await??;
    Ok(Json(data))
}

/// GET /api/series - Sampled readings and trouble markers for the charts
pub async fn get_series(State(state): State<DashboardState>) -> Result<Json<Series>, ApiError> {
    let config = Arc::clone(&state.config);
    let series = tokio::task::spawn_blocking(move || build_series(&config)).await??;
    Ok(Json(series))
}
