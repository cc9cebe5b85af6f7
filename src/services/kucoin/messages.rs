//! KuCoin REST response payloads

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SignalError};
use crate::models::candle::Candle;

pub const SUCCESS_CODE: &str = "200000";

/// Envelope shared by every public endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful response.
    pub fn into_data(self, what: &str) -> Result<T> {
        if self.code != SUCCESS_CODE {
            return Err(SignalError::DataUnavailable(format!(
                "KuCoin API error {} for {}: {}",
                self.code,
                what,
                self.msg.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }
        self.data
            .ok_or_else(|| SignalError::DataUnavailable(format!("no data returned for {}", what)))
    }
}

/// `GET /api/v1/market/orderbook/level1`
#[derive(Debug, Deserialize)]
pub struct Level1Ticker {
    #[serde(default)]
    pub price: Option<String>,
}

impl Level1Ticker {
    pub fn price(&self, symbol: &str) -> Result<f64> {
        let raw = self
            .price
            .as_deref()
            .ok_or_else(|| SignalError::DataUnavailable(format!("no price in ticker for {}", symbol)))?;
        raw.parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| {
                SignalError::DataUnavailable(format!("invalid price '{}' for {}", raw, symbol))
            })
    }
}

/// Candle row layout: `[time, open, close, high, low, volume, turnover]`.
/// Close sits at index 2.
pub mod candle_index {
    pub const TIME: usize = 0;
    pub const OPEN: usize = 1;
    pub const CLOSE: usize = 2;
    pub const HIGH: usize = 3;
    pub const LOW: usize = 4;
    pub const VOLUME: usize = 5;
    /// Time plus the four prices.
    pub const MIN_FIELDS: usize = 5;
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Parse one raw candle row; `index` is only used for error messages.
pub fn parse_candle(row: &Value, index: usize) -> Result<Candle> {
    use candle_index::*;

    let malformed =
        |why: &str| SignalError::DataUnavailable(format!("invalid candle at index {}: {}", index, why));

    let fields = row.as_array().ok_or_else(|| malformed("not an array"))?;
    if fields.len() < MIN_FIELDS {
        return Err(malformed(&format!("{} fields", fields.len())));
    }

    let price = |i: usize, name: &str| number(&fields[i]).ok_or_else(|| malformed(name));
    let open = price(OPEN, "open")?;
    let close = price(CLOSE, "close")?;
    let high = price(HIGH, "high")?;
    let low = price(LOW, "low")?;
    if close <= 0.0 {
        return Err(malformed(&format!("close price {}", close)));
    }

    let volume = fields.get(VOLUME).and_then(number).unwrap_or(0.0);
    let open_time = number(&fields[TIME])
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
        .ok_or_else(|| malformed("time"))?;

    Ok(Candle::new(open, high, low, close, volume, open_time))
}
