//! Lucky Signals Worker
//!
//! Runs the auto-signal scheduler without the HTTP surface.

use dotenvy::dotenv;
use lucky_signals::config::AppConfig;
use lucky_signals::core::bootstrap::Services;
use lucky_signals::logging;
use lucky_signals::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&config);

    info!("Starting Lucky Signals Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        interval = config.eval_interval.as_secs(),
        "Signal Evaluation: every {} seconds",
        config.eval_interval.as_secs()
    );
    info!(
        concurrency = config.concurrency,
        symbols = ?config.watchlist,
        timeframe = %config.timeframe,
        "Watchlist: {}",
        config.watchlist.join(", ")
    );
    if config.telegram.is_none() {
        warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set - batch summaries will only be logged");
    }

    let metrics = Arc::new(Metrics::new()?);
    let services = Services::from_config(&config, metrics)?;
    services.scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    services.scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
