//! RSI (Relative Strength Index) indicator

use crate::common::math;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI with Wilder smoothing, rounded to 2 decimals.
///
/// The first `period` deltas seed the average gain/loss with a simple mean;
/// every later delta folds in as `avg = (avg * (period - 1) + value) / period`.
///
/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, change.abs())
            }
        })
        .unzip();

    let mut avg_gain = math::seed_mean(&gains, period)?;
    let mut avg_loss = math::seed_mean(&losses, period)?;

    let smoothing = (period - 1) as f64;
    for (gain, loss) in gains.iter().zip(losses.iter()).skip(period) {
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(math::round_to(100.0 - (100.0 / (1.0 + rs)), 2))
}

/// Calculate RSI with default period (14)
pub fn rsi_default(closes: &[f64]) -> Option<f64> {
    rsi(closes, DEFAULT_RSI_PERIOD)
}
