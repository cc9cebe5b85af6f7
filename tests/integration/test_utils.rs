//! Shared fixtures: candle series, KuCoin payloads and in-memory collaborators.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lucky_signals::error::{Result, SignalError};
use lucky_signals::models::{Candle, Timeframe};
use lucky_signals::services::market_data::MarketDataProvider;
use lucky_signals::services::notifier::Notifier;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BASE_TS: i64 = 1_700_000_000;

/// Closes that wander up and down around an upward drift.
pub fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
        .collect()
}

pub fn candles_from_closes(closes: &[f64], timeframe: Timeframe) -> Vec<Candle> {
    let step = timeframe.duration_secs() as i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            Candle::new(
                close - 0.2,
                close + 0.5,
                close - 0.5,
                *close,
                100.0,
                Utc.timestamp_opt(BASE_TS + i as i64 * step, 0).unwrap(),
            )
        })
        .collect()
}

/// Exchange candle rows, newest first, from oldest-first closes.
pub fn kucoin_rows(closes: &[f64], timeframe: Timeframe) -> Vec<Value> {
    let step = timeframe.duration_secs() as i64;
    closes
        .iter()
        .enumerate()
        .rev()
        .map(|(i, close)| {
            json!([
                (BASE_TS + i as i64 * step).to_string(),
                format!("{:.4}", close - 0.2),
                format!("{:.4}", close),
                format!("{:.4}", close + 0.5),
                format!("{:.4}", close - 0.5),
                "100",
                "10000"
            ])
        })
        .collect()
}

pub async fn mount_kucoin_ticker(server: &MockServer, symbol: &str, price: f64) {
    Mock::given(method("GET"))
        .and(path("/api/v1/market/orderbook/level1"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": { "price": price.to_string(), "size": "0.1" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_kucoin_candles(server: &MockServer, symbol: &str, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/v1/market/candles"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": rows
        })))
        .mount(server)
        .await;
}

/// Ticker and candles for a symbol whose price follows [`wavy_closes`].
pub async fn mount_kucoin_symbol(server: &MockServer, symbol: &str) {
    let closes = wavy_closes(150);
    let price = *closes.last().unwrap_or(&100.0);
    mount_kucoin_ticker(server, symbol, price).await;
    mount_kucoin_candles(server, symbol, kucoin_rows(&closes, Timeframe::FifteenMinutes)).await;
}

/// In-memory market data with optional failures and latency.
#[derive(Default)]
pub struct MockProvider {
    candles: HashMap<String, Vec<Candle>>,
    failing: HashSet<String>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    candle_requests: Mutex<Vec<(String, Timeframe)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.candles.insert(symbol.to_string(), candles);
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn candle_requests(&self) -> Vec<(String, Timeframe)> {
        self.candle_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(symbol) {
            return Err(SignalError::Network(format!("connection reset for {}", symbol)));
        }
        self.candles
            .get(symbol)
            .and_then(|c| c.last())
            .map(|c| c.close)
            .ok_or_else(|| SignalError::DataUnavailable(format!("unknown symbol {}", symbol)))
    }

    async fn get_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        if let Ok(mut requests) = self.candle_requests.lock() {
            requests.push((symbol.to_string(), timeframe));
        }
        if self.failing.contains(symbol) {
            return Err(SignalError::Network(format!("connection reset for {}", symbol)));
        }
        let candles = self
            .candles
            .get(symbol)
            .ok_or_else(|| SignalError::DataUnavailable(format!("unknown symbol {}", symbol)))?;
        let start = candles.len().saturating_sub(limit);
        Ok(candles[start..].to_vec())
    }
}

/// Notifier that keeps every message in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
        Ok(())
    }
}
