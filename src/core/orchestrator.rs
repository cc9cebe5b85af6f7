//! Single-symbol pipeline and bounded-concurrency batches over a watchlist.

use futures_util::future::{join_all, try_join_all};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{Result, SignalError};
use crate::metrics::Metrics;
use crate::models::candle::{Candle, Timeframe};
use crate::models::signal::{Signal, SignalOutcome};
use crate::models::strategy::StrategyConfig;
use crate::services::market_data::{normalize_symbol, MarketDataProvider};
use crate::signals::SignalEngine;

pub const DEFAULT_CONCURRENCY: usize = 10;

pub struct SignalOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    engine: SignalEngine,
    concurrency: usize,
    metrics: Option<Arc<Metrics>>,
}

impl SignalOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, strategy: StrategyConfig) -> Self {
        Self {
            provider,
            engine: SignalEngine::new(strategy),
            concurrency: DEFAULT_CONCURRENCY,
            metrics: None,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn strategy(&self) -> &StrategyConfig {
        self.engine.strategy()
    }

    /// Full pipeline for one symbol, without the accuracy gate.
    pub async fn generate(&self, symbol: &str, timeframe: Timeframe) -> Result<Signal> {
        let (signal, _) = self.pipeline(symbol, timeframe).await?;
        Ok(signal)
    }

    /// Pipeline plus accuracy gate, propagating pipeline errors. The outcome
    /// is `Emitted` or `Skipped`; with the gate disabled it is always `Emitted`.
    pub async fn generate_gated(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<SignalOutcome> {
        let (signal, candles) = self.pipeline(symbol, timeframe).await?;
        Ok(self.gate(signal, &candles))
    }

    /// Pipeline plus accuracy gate. Never fails: errors become `Failed`.
    pub async fn evaluate(&self, symbol: &str, timeframe: Timeframe) -> SignalOutcome {
        let start = Instant::now();
        let symbol = normalize_symbol(symbol);

        let outcome = match self.generate_gated(&symbol, timeframe).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(symbol = %symbol, timeframe = %timeframe, error = %e, "Orchestrator: pipeline failed for {}", symbol);
                SignalOutcome::Failed {
                    symbol: symbol.clone(),
                    error: e.to_string(),
                }
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics
                .signal_evaluation_duration_seconds
                .observe(start.elapsed().as_secs_f64());
            metrics.record_outcome(match &outcome {
                SignalOutcome::Emitted(_) => "emitted",
                SignalOutcome::Skipped { .. } => "skipped",
                SignalOutcome::Failed { .. } => "failed",
            });
        }

        outcome
    }

    /// Evaluate every symbol with at most `concurrency` pipelines in flight.
    /// One symbol failing never cancels the others. Results are sorted by symbol.
    pub async fn run_batch(&self, symbols: &[String], timeframe: Timeframe) -> Vec<SignalOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        info!(
            symbol_count = symbols.len(),
            concurrency = self.concurrency,
            timeframe = %timeframe,
            "Orchestrator: starting batch of {} symbols",
            symbols.len()
        );

        let tasks = symbols.iter().map(|symbol| {
            let semaphore = semaphore.clone();
            async move {
                // acquire only fails on a closed semaphore
                let _permit = semaphore.acquire().await.ok();
                self.evaluate(symbol, timeframe).await
            }
        });

        let mut outcomes = join_all(tasks).await;
        outcomes.sort_by(|a, b| a.symbol().cmp(b.symbol()));

        let emitted = outcomes
            .iter()
            .filter(|o| matches!(o, SignalOutcome::Emitted(_)))
            .count();
        info!(
            emitted = emitted,
            total = outcomes.len(),
            "Orchestrator: batch finished, {} of {} symbols emitted",
            emitted,
            outcomes.len()
        );
        outcomes
    }

    /// Returns the signal and the primary timeframe's candles.
    async fn pipeline(&self, symbol: &str, timeframe: Timeframe) -> Result<(Signal, Vec<Candle>)> {
        let symbol = normalize_symbol(symbol);
        let strategy = self.engine.strategy();
        let timeframes = strategy.timeframes_for(timeframe);
        let limit = strategy.candle_limit;

        let price = self.provider.get_current_price(&symbol).await?;
        let mut series = try_join_all(timeframes.iter().map(|tf| {
            let provider = self.provider.clone();
            let symbol = symbol.clone();
            let tf = *tf;
            async move {
                let candles = provider.get_candles(&symbol, tf, limit).await?;
                Ok::<_, SignalError>((tf, candles))
            }
        }))
        .await?;

        let analyses: Vec<_> = series
            .iter()
            .map(|(tf, candles)| self.engine.analyze_timeframe(*tf, candles, price))
            .collect();
        let signal = self.engine.build_signal(&symbol, timeframe, &analyses, price);

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            decision = %signal.decision,
            confidence = signal.confidence,
            "Orchestrator: {} {} -> {}",
            symbol,
            timeframe,
            signal.decision
        );

        let primary = if series.is_empty() {
            Vec::new()
        } else {
            series.swap_remove(0).1
        };
        Ok((signal, primary))
    }

    fn gate(&self, mut signal: Signal, candles: &[Candle]) -> SignalOutcome {
        let config = &self.engine.strategy().backtest;
        if !config.enabled {
            return SignalOutcome::Emitted(signal);
        }

        let result = self.engine.backtest(candles);
        signal.accuracy = Some(result.accuracy_pct);

        if result.accuracy_pct < config.threshold_pct {
            info!(
                symbol = %signal.symbol,
                accuracy = result.accuracy_pct,
                samples = result.sample_count,
                "Orchestrator: {} skipped at {:.2}% accuracy",
                signal.symbol,
                result.accuracy_pct
            );
            return SignalOutcome::Skipped {
                symbol: signal.symbol,
                accuracy: result.accuracy_pct,
                reason: format!("accuracy below {}% threshold", config.threshold_pct),
            };
        }

        SignalOutcome::Emitted(signal)
    }
}
