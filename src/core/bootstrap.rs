//! Wires providers, orchestrator, notifier and scheduler from configuration.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::services::kucoin::{KucoinMarketDataProvider, KucoinRestClient};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::{Notifier, TelegramNotifier};

use super::orchestrator::SignalOrchestrator;
use super::scheduler::AutoSignalScheduler;

pub struct Services {
    pub metrics: Arc<Metrics>,
    pub orchestrator: Arc<SignalOrchestrator>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub scheduler: Arc<AutoSignalScheduler>,
}

impl Services {
    pub fn from_config(config: &AppConfig, metrics: Arc<Metrics>) -> Result<Self> {
        let client = KucoinRestClient::new(config.kucoin_api_base.clone(), config.http_timeout)?;
        let provider: Arc<dyn MarketDataProvider> =
            Arc::new(KucoinMarketDataProvider::new(Arc::new(client)));
        Self::with_provider(config, provider, metrics)
    }

    /// Same wiring with an injected market data provider.
    pub fn with_provider(
        config: &AppConfig,
        provider: Arc<dyn MarketDataProvider>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        let orchestrator = Arc::new(
            SignalOrchestrator::new(provider, config.strategy.clone())
                .with_concurrency(config.concurrency)
                .with_metrics(metrics.clone()),
        );

        let notifier: Option<Arc<dyn Notifier>> = match &config.telegram {
            Some(telegram) => {
                let http = reqwest::Client::builder()
                    .timeout(config.http_timeout)
                    .build()?;
                Some(Arc::new(TelegramNotifier::with_client(
                    telegram.api_base.clone(),
                    telegram.bot_token.clone(),
                    telegram.chat_id.clone(),
                    http,
                )))
            }
            None => None,
        };

        let mut scheduler = AutoSignalScheduler::new(
            orchestrator.clone(),
            config.watchlist.clone(),
            config.timeframe,
            config.eval_interval,
        )?
        .with_metrics(metrics.clone());
        if let Some(notifier) = &notifier {
            scheduler = scheduler.with_notifier(notifier.clone());
        }

        Ok(Self {
            metrics,
            orchestrator,
            notifier,
            scheduler: Arc::new(scheduler),
        })
    }
}
