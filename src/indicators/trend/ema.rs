//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Full EMA series.
///
/// Index 0 is the SMA seed of the first `period` values and corresponds to
/// input index `period - 1`; each later value folds in as
/// `v * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
/// Empty when there are fewer than `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(seed) = math::seed_mean(values, period) else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(seed);

    let mut prev = seed;
    for value in &values[period..] {
        prev = value * k + prev * (1.0 - k);
        series.push(prev);
    }
    series
}

/// Final EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}

/// Relationship between a fast and a slow EMA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmaTrend {
    /// Fast above slow; gap relative to the slow EMA in percent.
    Bullish(f64),
    Bearish(f64),
    Flat,
}

impl EmaTrend {
    pub fn from_pair(fast: f64, slow: f64) -> Self {
        let gap_pct = math::pct_change(slow, fast);
        if fast > slow {
            EmaTrend::Bullish(gap_pct)
        } else if fast < slow {
            EmaTrend::Bearish(gap_pct)
        } else {
            EmaTrend::Flat
        }
    }
}
