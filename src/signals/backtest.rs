//! Walk-forward replay of a decision rule over recent history.
//!
//! Each replayed point only sees candles up to and including itself; the next
//! candle's close decides whether the call was right.

use crate::common::math::{pct_change, round_to};
use crate::indicators;
use crate::models::candle::Candle;
use crate::models::indicators::IndicatorParams;
use crate::models::signal::{BacktestResult, Decision};
use crate::models::strategy::BacktestConfig;

use super::decision::DecisionEngine;

/// Replay `decide` over the last `test_periods` points of `candles`.
///
/// `decide` receives the visible window and returns `None` when it cannot
/// form a view (undefined indicators); such points are not counted.
pub fn replay<F>(candles: &[Candle], config: &BacktestConfig, mut decide: F) -> BacktestResult
where
    F: FnMut(&[Candle]) -> Option<Decision>,
{
    let n = candles.len();
    if n < 2 || config.test_periods == 0 || n < config.test_periods + config.min_history {
        return BacktestResult::empty();
    }

    let start = n.saturating_sub(config.test_periods).max(1);
    let mut samples = 0usize;
    let mut correct = 0usize;

    for i in start..n - 1 {
        let window = &candles[..=i];
        if window.len() < config.min_history {
            continue;
        }
        let Some(decision) = decide(window) else {
            continue;
        };

        let change = pct_change(candles[i].close, candles[i + 1].close);
        let hit = match decision {
            Decision::Buy => change > config.min_move_pct,
            Decision::Sell => change < -config.min_move_pct,
            Decision::Hold if config.score_hold => change.abs() <= config.hold_band_pct,
            Decision::Hold => continue,
        };

        samples += 1;
        if hit {
            correct += 1;
        }
    }

    if samples == 0 {
        return BacktestResult::empty();
    }

    BacktestResult {
        accuracy_pct: round_to(correct as f64 / samples as f64 * 100.0, 2),
        sample_count: samples,
        correct_count: correct,
    }
}

/// Replay the configured decision engine on a single timeframe's candles.
pub fn run(
    candles: &[Candle],
    engine: &DecisionEngine,
    params: &IndicatorParams,
    config: &BacktestConfig,
) -> BacktestResult {
    replay(candles, config, |window| {
        let snapshot = indicators::snapshot(window, params);
        if snapshot.rsi.is_none() || !snapshot.has_trend() {
            return None;
        }
        Some(engine.decide_single(&snapshot).decision)
    })
}
