//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::candle::Candle;

pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Calculate ATR as the simple mean of the last `period` true ranges.
///
/// Each true range needs the previous close, so `period + 1` candles are
/// required.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let tr_values: Vec<f64> = candles
        .windows(2)
        .map(|w| math::true_range(w[1].high, w[1].low, w[0].close))
        .collect();

    math::sma(&tr_values, period)
}

/// Calculate ATR with default period (14)
pub fn atr_default(candles: &[Candle]) -> Option<f64> {
    atr(candles, DEFAULT_ATR_PERIOD)
}
