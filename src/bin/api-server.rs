//! Lucky Signals API Server
//!
//! HTTP API with on-demand signals, watchlist batches, health and metrics.
//! The auto-signal scheduler can be toggled over HTTP or started on boot
//! with `AUTO_SIGNALS=true`.

use dotenvy::dotenv;
use lucky_signals::config::AppConfig;
use lucky_signals::core::bootstrap::Services;
use lucky_signals::core::http::{start_server, AppState};
use lucky_signals::logging;
use lucky_signals::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&config);

    info!("Starting Lucky Signals API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        strategy = ?config.strategy.variant,
        risk = ?config.strategy.risk,
        symbols = config.watchlist.len(),
        "Signal configuration"
    );
    if config.telegram.is_none() {
        warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set - notifications disabled");
    }

    let metrics = Arc::new(Metrics::new()?);
    let services = Services::from_config(&config, metrics)?;
    let scheduler = services.scheduler.clone();
    if config.auto_signals {
        scheduler.start().await;
    }

    let state = AppState::new(services, config.watchlist.clone(), config.timeframe);
    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            scheduler.stop().await;
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
