use serde::{Deserialize, Serialize};

/// Lookback periods used to build an [`IndicatorSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_fast_period: 12,
            ema_slow_period: 26,
            atr_period: 14,
        }
    }
}

/// Indicator values at the newest closed candle. Each is `None` until enough
/// history exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn has_trend(&self) -> bool {
        self.ema_fast.is_some() && self.ema_slow.is_some()
    }
}
