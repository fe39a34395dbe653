//! redmeter - sensor trouble dashboard
//!
//! Reads a CSV of timestamped pressure / temperature / DV readings, flags
//! troubled rows and serves the result as JSON plus a dashboard page.
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard with the default data file and threshold rules
//! cargo run --release
//!
//! # Regression mode on a specific file
//! ./redmeter serve --data June18-21_data.csv --mode regression
//!
//! # Print the dashboard JSON once and exit
//! ./redmeter report --data June18-21_data.csv
//! ```
//!
//! # Environment Variables
//!
//! - `REDMETER_CONFIG`: Path to a TOML config file
//! - `REDMETER_SERVER_ADDR`: Server bind address (default: 0.0.0.0:5000)
//! - `REDMETER_DATA`: Sensor CSV path
//! - `REDMETER_CORS_ORIGINS`: Comma-separated cross-origin allow list
//! - `REDMETER_LOG_FORMAT`: `json` for structured logs (default: text)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use redmeter::api::{create_app, DashboardState};
use redmeter::config::DashboardConfig;
use redmeter::dashboard::build_dashboard;
use redmeter::types::ClassifierMode;

/// Set to `json` for structured log lines.
const LOG_FORMAT_ENV: &str = "REDMETER_LOG_FORMAT";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "redmeter")]
#[command(about = "Sensor trouble dashboard for pressure, temperature and DV readings")]
#[command(version)]
struct CliArgs {
    /// Load configuration from this TOML file (errors are fatal)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the sensor CSV path
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Override the classifier mode
    #[arg(long, global = true, value_enum)]
    mode: Option<ClassifierMode>,

    /// Override the server address (default: "0.0.0.0:5000")
    #[arg(short, long, global = true, value_name = "HOST:PORT")]
    addr: Option<String>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug, Clone, Copy, Default)]
enum SubCommand {
    /// Run the HTTP dashboard (default)
    #[default]
    Serve,
    /// Print the dashboard JSON to stdout and exit
    Report,
}

// ============================================================================
// Configuration
// ============================================================================

/// File (or search order) first, then env overrides, then CLI flags.
fn resolve_config(args: &CliArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DashboardConfig::load(),
    };

    config.apply_env_overrides();

    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }
    if let Some(data) = &args.data {
        config.data.path = data.clone();
    }
    if let Some(mode) = args.mode {
        config.classifier.mode = mode;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

// ============================================================================
// Commands
// ============================================================================

fn run_report(config: &DashboardConfig) -> Result<()> {
    let data = build_dashboard(config)
        .with_context(|| format!("Failed to build report from {}", config.data.path.display()))?;
    let json = serde_json::to_string_pretty(&data).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

async fn run_server(config: DashboardConfig) -> Result<()> {
    let server_addr = config.server.addr.clone();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  redmeter - Sensor Trouble Dashboard");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        data = %config.data.path.display(),
        mode = %config.classifier.mode,
        "Dashboard configuration"
    );
    if !config.data.path.exists() {
        // Not fatal: the file is read per request and may appear later
        warn!(path = %config.data.path.display(), "Data file not found, API requests will fail until it exists");
    }

    let app = create_app(DashboardState::new(config));
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("Dashboard available at: http://{}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    serve_http(listener, app, cancel_token).await
}

async fn serve_http(
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("[HttpServer] Task starting");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `report` output stays clean JSON
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let args = CliArgs::parse();
    let config = resolve_config(&args)?;

    match args.command.unwrap_or_default() {
        SubCommand::Report => run_report(&config),
        SubCommand::Serve => run_server(config).await,
    }
}
