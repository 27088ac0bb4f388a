//! Application entry point for the `agrisaarthi` backend service.
//!
//! This binary orchestrates the startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Loading the crop, price, and remedy tables (fatal on any error)
//! - Building the model client and the history log
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `MODEL_URL` (**required**) – leaf disease model `:predict` endpoint
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! See `config.rs` for the remaining optional settings.
use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use agrisaarthi::detector::TfServingClient;
use agrisaarthi::{config, routes, AppState, CropCatalog, DiseaseDetector, HistoryLog, RemedyTable};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    // Reference data is loaded once and never mutated; a bad file stops startup
    let catalog = CropCatalog::load(&cfg.crop_data_path, &cfg.price_data_path)
        .context("Failed to load crop reference data")?;
    let remedies = RemedyTable::load(&cfg.remedy_data_path)
        .context("Failed to load remedy table")?;

    let model = TfServingClient::new(cfg.model_url.clone(), cfg.model_timeout)
        .context("Failed to build model client")?;

    let state = AppState {
        catalog: Arc::new(catalog),
        detector: Arc::new(DiseaseDetector::new(Arc::new(model), remedies)),
        history: Arc::new(HistoryLog::new(cfg.history_path.clone())),
        max_upload_bytes: cfg.max_upload_bytes,
    };

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// - Color output follows `FORCE_COLOR` (`1|true|yes` on, `0|false|no` off),
///   otherwise TTY detection
/// - `AXUM_SPAN_EVENTS`: `"full"` for ENTER/EXIT/CLOSE, `"enter_exit"` for
///   ENTER/EXIT, anything else CLOSE only
/// - `RUST_LOG` wins when set; otherwise `AXUM_LOG_LEVEL` picks the level
///
/// Call once, before any tracing macro fires.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("{level},tower_http=info,hyper=warn,reqwest=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
