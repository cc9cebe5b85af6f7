//! Pure indicator functions over chronologically ordered data.

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use momentum::rsi;
pub use trend::{ema, ema_series};
pub use volatility::atr;

use crate::models::candle::{closes, Candle};
use crate::models::indicators::{IndicatorParams, IndicatorSnapshot};

/// Compute every indicator at the newest candle of `candles`.
pub fn snapshot(candles: &[Candle], params: &IndicatorParams) -> IndicatorSnapshot {
    let closes = closes(candles);
    IndicatorSnapshot {
        rsi: rsi(&closes, params.rsi_period),
        ema_fast: ema(&closes, params.ema_fast_period),
        ema_slow: ema(&closes, params.ema_slow_period),
        atr: atr(candles, params.atr_period),
    }
}
