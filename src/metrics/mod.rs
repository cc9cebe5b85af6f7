//! Prometheus metrics for the HTTP surface and the signal pipeline

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    /// Per-symbol pipeline runs by outcome (`emitted`, `skipped`, `failed`).
    pub signal_evaluations_total: IntCounterVec,
    pub signal_evaluation_duration_seconds: Histogram,
    pub notifications_sent_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub auto_signals_running: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        )?;
        let signal_evaluations_total = IntCounterVec::new(
            Opts::new(
                "signal_evaluations_total",
                "Signal pipeline runs grouped by outcome",
            ),
            &["outcome"],
        )?;
        let signal_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_evaluation_duration_seconds",
                "Duration of a single-symbol signal pipeline run",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        )?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Alerts delivered to the webhook")?;
        let notification_failures_total = IntCounter::new(
            "notification_failures_total",
            "Alerts that could not be delivered",
        )?;
        let auto_signals_running = Gauge::new(
            "auto_signals_running",
            "1 while the auto-signal scheduler is running",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(auto_signals_running.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            signal_evaluations_total,
            signal_evaluation_duration_seconds,
            notifications_sent_total,
            notification_failures_total,
            auto_signals_running,
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.signal_evaluations_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
