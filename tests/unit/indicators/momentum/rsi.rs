//! Unit tests for RSI indicator

use lucky_signals::indicators::momentum::rsi::{rsi, rsi_default, DEFAULT_RSI_PERIOD};

#[test]
fn rsi_undefined_without_period_plus_one_closes() {
    let closes: Vec<f64> = (0..DEFAULT_RSI_PERIOD).map(|i| 100.0 + i as f64).collect();
    assert_eq!(rsi_default(&closes), None);
    assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), None);
}

#[test]
fn rsi_is_100_when_there_are_no_losses() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    assert_eq!(rsi_default(&closes), Some(100.0));
}

#[test]
fn rsi_is_100_at_exactly_period_plus_one_rising_closes() {
    let closes: Vec<f64> = (0..=DEFAULT_RSI_PERIOD).map(|i| 100.0 + i as f64).collect();
    assert_eq!(closes.len(), DEFAULT_RSI_PERIOD + 1);
    assert_eq!(rsi_default(&closes), Some(100.0));
}

#[test]
fn rsi_is_0_when_there_are_only_losses() {
    let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
    assert_eq!(rsi_default(&closes), Some(0.0));
}

#[test]
fn rsi_applies_wilder_smoothing_after_seed() {
    // seed: gain 0.5, loss 0.5; third delta +1 -> gain 0.75, loss 0.25 -> RS 3
    assert_eq!(rsi(&[1.0, 2.0, 1.0, 2.0], 2), Some(75.0));
}

#[test]
fn rsi_stays_in_bounds_and_is_deterministic() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.05)
        .collect();
    let first = rsi_default(&closes).expect("enough closes");
    assert!((0.0..=100.0).contains(&first));
    assert_eq!(rsi_default(&closes), Some(first));
}
