//! Interval scheduler that runs watchlist batches and posts a summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::error::{Result, SignalError};
use crate::metrics::Metrics;
use crate::models::candle::Timeframe;
use crate::models::signal::BatchReport;
use crate::services::notifier::{format_batch_summary, Notifier};

use super::orchestrator::SignalOrchestrator;

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub interval_seconds: u64,
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub last_run: Option<DateTime<Utc>>,
    pub runs: u64,
}

struct BatchJob {
    orchestrator: Arc<SignalOrchestrator>,
    notifier: Option<Arc<dyn Notifier>>,
    metrics: Option<Arc<Metrics>>,
    symbols: Vec<String>,
    timeframe: Timeframe,
    last_run: RwLock<Option<DateTime<Utc>>>,
    runs: AtomicU64,
}

impl BatchJob {
    async fn run(&self) -> BatchReport {
        let outcomes = self.orchestrator.run_batch(&self.symbols, self.timeframe).await;
        let report = BatchReport::from_outcomes(outcomes);

        *self.last_run.write().await = Some(Utc::now());
        self.runs.fetch_add(1, Ordering::Relaxed);

        info!(
            signals = report.signals.len(),
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            "AutoSignalScheduler: cycle complete"
        );

        if let Some(notifier) = &self.notifier {
            let summary = format_batch_summary(&report, self.timeframe);
            match notifier.send(&summary).await {
                Ok(()) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.notifications_sent_total.inc();
                    }
                }
                Err(e) => {
                    error!(error = %e, "AutoSignalScheduler: failed to send batch summary");
                    if let Some(metrics) = &self.metrics {
                        metrics.notification_failures_total.inc();
                    }
                }
            }
        }

        report
    }
}

/// Owns the auto-signal loop. `start` is idempotent and `stop` aborts the loop.
pub struct AutoSignalScheduler {
    job: Arc<BatchJob>,
    interval: Duration,
    handle: RwLock<Option<JoinHandle<()>>>,
    running: AtomicBool,
}

impl AutoSignalScheduler {
    pub fn new(
        orchestrator: Arc<SignalOrchestrator>,
        symbols: Vec<String>,
        timeframe: Timeframe,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(SignalError::Config(
                "scheduler interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            job: Arc::new(BatchJob {
                orchestrator,
                notifier: None,
                metrics: None,
                symbols,
                timeframe,
                last_run: RwLock::new(None),
                runs: AtomicU64::new(0),
            }),
            interval,
            handle: RwLock::new(None),
            running: AtomicBool::new(false),
        })
    }

    /// Must be called before `start`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        if let Some(job) = Arc::get_mut(&mut self.job) {
            job.notifier = Some(notifier);
        }
        self
    }

    /// Must be called before `start`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        if let Some(job) = Arc::get_mut(&mut self.job) {
            job.metrics = Some(metrics);
        }
        self
    }

    /// Returns `false` when the loop was already running.
    pub async fn start(&self) -> bool {
        let mut handle = self.handle.write().await;
        if self.running.load(Ordering::SeqCst) {
            return false;
        }

        let job = self.job.clone();
        let period = self.interval;
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                job.run().await;
            }
        }));
        self.running.store(true, Ordering::SeqCst);
        self.set_gauge(1.0);

        info!(
            interval = self.interval.as_secs(),
            symbol_count = self.job.symbols.len(),
            timeframe = %self.job.timeframe,
            "AutoSignalScheduler: started with interval {}s",
            self.interval.as_secs()
        );
        true
    }

    /// Returns `false` when nothing was running.
    pub async fn stop(&self) -> bool {
        let mut handle = self.handle.write().await;
        let Some(task) = handle.take() else {
            return false;
        };
        task.abort();
        self.running.store(false, Ordering::SeqCst);
        self.set_gauge(0.0);
        info!("AutoSignalScheduler: stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.is_running(),
            interval_seconds: self.interval.as_secs(),
            symbols: self.job.symbols.clone(),
            timeframe: self.job.timeframe,
            last_run: *self.job.last_run.read().await,
            runs: self.job.runs.load(Ordering::Relaxed),
        }
    }

    /// Run a single batch cycle immediately, outside the loop.
    pub async fn run_once(&self) -> BatchReport {
        self.job.run().await
    }

    fn set_gauge(&self, value: f64) {
        if let Some(metrics) = &self.job.metrics {
            metrics.auto_signals_running.set(value);
        }
    }
}
