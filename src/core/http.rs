//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::error::SignalError;
use crate::metrics::Metrics;
use crate::models::candle::Timeframe;
use crate::models::signal::{BatchReport, Decision, SignalOutcome};
use crate::services::notifier::{format_batch_summary, format_signal_alert, Notifier};

use super::bootstrap::Services;
use super::orchestrator::SignalOrchestrator;
use super::scheduler::{AutoSignalScheduler, SchedulerStatus};

pub const DEFAULT_SYMBOL: &str = "BTC-USDT";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub orchestrator: Arc<SignalOrchestrator>,
    pub scheduler: Arc<AutoSignalScheduler>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub watchlist: Arc<Vec<String>>,
    pub default_timeframe: Timeframe,
}

impl AppState {
    pub fn new(services: Services, watchlist: Vec<String>, default_timeframe: Timeframe) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: services.metrics,
            start_time: Arc::new(Instant::now()),
            orchestrator: services.orchestrator,
            scheduler: services.scheduler,
            notifier: services.notifier,
            watchlist: Arc::new(watchlist),
            default_timeframe,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Pipeline error rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub SignalError);

impl From<SignalError> for ApiError {
    fn from(err: SignalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SignalError::InvalidTimeframe(_) | SignalError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "lucky-signals"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    symbol: Option<String>,
    timeframe: Option<String>,
    #[serde(default)]
    notify: bool,
}

#[derive(Debug, Deserialize)]
struct BatchQuery {
    timeframe: Option<String>,
    #[serde(default)]
    notify: bool,
}

fn resolve_timeframe(raw: Option<&str>, default: Timeframe) -> Result<Timeframe, SignalError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Timeframe::from_str(raw),
        None => Ok(default),
    }
}

/// Send a message, counting the outcome. Failures are logged, never returned.
async fn notify(state: &AppState, text: &str) {
    let Some(notifier) = &state.notifier else {
        warn!("Notification requested but no notifier is configured");
        return;
    };
    match notifier.send(text).await {
        Ok(()) => state.metrics.notifications_sent_total.inc(),
        Err(e) => {
            error!(error = %e, "Failed to deliver notification");
            state.metrics.notification_failures_total.inc();
        }
    }
}

/// Single-symbol signal behind the accuracy gate. A skipped symbol is a
/// 200 with a skip record; pipeline errors map through `ApiError`.
async fn get_signal(
    State(state): State<AppState>,
    Query(params): Query<SignalQuery>,
) -> Result<Response, ApiError> {
    let symbol = params
        .symbol
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
    let timeframe = resolve_timeframe(params.timeframe.as_deref(), state.default_timeframe)?;

    let outcome = state
        .orchestrator
        .generate_gated(&symbol, timeframe)
        .await
        .map_err(|e| {
            error!(symbol = %symbol, timeframe = %timeframe, error = %e, "Signal generation failed");
            e
        })?;

    match outcome {
        SignalOutcome::Emitted(signal) => {
            if params.notify && signal.decision != Decision::Hold {
                notify(&state, &format_signal_alert(&signal)).await;
            }
            Ok(Json(signal).into_response())
        }
        SignalOutcome::Skipped {
            symbol,
            accuracy,
            reason,
        } => Ok(Json(json!({
            "symbol": symbol,
            "skipped": true,
            "accuracy": accuracy,
            "reason": reason,
        }))
        .into_response()),
        SignalOutcome::Failed { error, .. } => {
            Err(ApiError(SignalError::DataUnavailable(error)))
        }
    }
}

/// Gated batch over the watchlist.
async fn get_signals(
    State(state): State<AppState>,
    Query(params): Query<BatchQuery>,
) -> Result<Json<BatchReport>, ApiError> {
    let timeframe = resolve_timeframe(params.timeframe.as_deref(), state.default_timeframe)?;
    let outcomes = state.orchestrator.run_batch(&state.watchlist, timeframe).await;
    let report = BatchReport::from_outcomes(outcomes);

    if params.notify {
        notify(&state, &format_batch_summary(&report, timeframe)).await;
    }

    Ok(Json(report))
}

async fn start_auto_signals(State(state): State<AppState>) -> Json<Value> {
    let started = state.scheduler.start().await;
    let message = if started {
        "auto signals started"
    } else {
        "auto signals already running"
    };
    Json(json!({ "message": message, "status": state.scheduler.status().await }))
}

async fn stop_auto_signals(State(state): State<AppState>) -> Json<Value> {
    let stopped = state.scheduler.stop().await;
    let message = if stopped {
        "auto signals stopped"
    } else {
        "auto signals not running"
    };
    Json(json!({ "message": message, "status": state.scheduler.status().await }))
}

async fn auto_signals_status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status().await)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signal", get(get_signal))
        .route("/api/signals", get(get_signals))
        .route("/api/auto-signals/start", post(start_auto_signals))
        .route("/api/auto-signals/stop", post(stop_auto_signals))
        .route("/api/auto-signals/status", get(auto_signals_status))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
