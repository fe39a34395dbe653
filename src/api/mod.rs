//! REST API module using Axum
//!
//! Serves the redmeter dashboard:
//! - JSON endpoints under `/api`, recomputed from the CSV on every request
//! - `/health` liveness probe
//! - Static page and assets via `rust-embed` (compiled into the binary)

pub mod envelope;
pub mod handlers;
mod routes;

pub use envelope::ApiError;
pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use rust_embed::Embed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable listing allowed cross-origin callers.
pub const CORS_ORIGINS_ENV: &str = "REDMETER_CORS_ORIGINS";

/// Dashboard page and its static assets.
#[derive(Embed)]
#[folder = "assets/"]
struct DashboardAssets;

fn asset_response(path: &str) -> Option<Response> {
    let content = DashboardAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.into_owned(),
        )
            .into_response(),
    )
}

/// GET / - Dashboard page
async fn index() -> Response {
    asset_response("index.html").unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

/// Serve a static asset, or 404.
async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    asset_response(path).unwrap_or_else(|| (StatusCode::NOT_FOUND, "Not found").into_response())
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `REDMETER_CORS_ORIGINS` to a comma-separated list of allowed origins
/// to let another host read the JSON endpoints.
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    match std::env::var(CORS_ORIGINS_ENV) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

/// Create the complete application router with API and static serving.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api", routes::api_routes(state))
        .merge(routes::health_routes())
        .fallback(serve_asset)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer())
}
