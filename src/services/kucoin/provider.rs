//! KuCoin market data provider implementation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::client::KucoinRestClient;
use super::messages::parse_candle;
use crate::error::{Result, SignalError};
use crate::models::candle::{Candle, Timeframe};
use crate::services::market_data::{normalize_symbol, MarketDataProvider};

pub struct KucoinMarketDataProvider {
    client: Arc<KucoinRestClient>,
}

impl KucoinMarketDataProvider {
    pub fn new(client: Arc<KucoinRestClient>) -> Self {
        Self { client }
    }
}

/// Turn newest-first rows into closed, oldest-first candles.
///
/// The newest row is the still-forming candle and is dropped so signals never
/// repaint. The most recent `limit` closed candles are kept.
pub fn closed_candles(rows: &[serde_json::Value], limit: usize) -> Result<Vec<Candle>> {
    if rows.is_empty() {
        return Err(SignalError::DataUnavailable(
            "no candle data returned".to_string(),
        ));
    }

    let mut candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_candle(row, i))
        .collect::<Result<Vec<_>>>()?;

    candles.reverse();
    if candles.len() > 1 {
        candles.pop();
    }
    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for KucoinMarketDataProvider {
    async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        let symbol = normalize_symbol(symbol);
        let ticker = self.client.fetch_ticker(&symbol).await?.into_data(&symbol)?;
        ticker.price(&symbol)
    }

    async fn get_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let symbol = normalize_symbol(symbol);
        let rows = self
            .client
            .fetch_candles(&symbol, timeframe)
            .await?
            .into_data(&symbol)?;

        let candles = closed_candles(&rows, limit).map_err(|e| match e {
            SignalError::DataUnavailable(msg) => {
                SignalError::DataUnavailable(format!("{} {}: {}", symbol, timeframe, msg))
            }
            other => other,
        })?;

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            raw = rows.len(),
            count = candles.len(),
            "get_candles for {}: {} closed candles",
            symbol,
            candles.len()
        );
        Ok(candles)
    }
}
