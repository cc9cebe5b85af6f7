//! Market data provider interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::candle::{Candle, Timeframe};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest traded price for a symbol.
    async fn get_current_price(&self, symbol: &str) -> Result<f64>;

    /// Closed candles, oldest first, at most `limit` of them.
    async fn get_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>>;
}

/// Uppercase a symbol and use `-` as the pair separator (`btc/usdt` → `BTC-USDT`).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .to_ascii_uppercase()
        .replace(['/', '_'], "-")
}
