//! Error envelope for the JSON endpoints.
//!
//! Every failure leaves the API as `500 {"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::acquisition::LoadError;

/// Error body: `{ "error": "..." }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures surfaced by the dashboard handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Dashboard computation failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!(error = %message, "Request failed");
        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}
