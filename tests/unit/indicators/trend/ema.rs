//! Unit tests for EMA indicator

use lucky_signals::indicators::trend::ema::{ema, ema_series, EmaTrend};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn ema_undefined_with_fewer_values_than_period() {
    assert_eq!(ema(&[1.0, 2.0], 3), None);
    assert!(ema_series(&[1.0, 2.0], 3).is_empty());
}

#[test]
fn ema_of_constant_series_is_the_constant() {
    let values = vec![5.0; 40];
    let value = ema(&values, 12).expect("ema defined");
    assert!(approx(value, 5.0));
}

#[test]
fn ema_series_is_seeded_with_sma() {
    let series = ema_series(&[1.0, 2.0, 3.0, 4.0], 2);
    assert_eq!(series.len(), 3);
    assert!(approx(series[0], 1.5));
    assert!(approx(series[1], 2.5));
    assert!(approx(series[2], 3.5));
}

#[test]
fn ema_series_length_matches_input_minus_warmup() {
    let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
    assert_eq!(ema_series(&values, 12).len(), 19);
}

#[test]
fn ema_trend_reports_gap_relative_to_slow() {
    match EmaTrend::from_pair(101.0, 100.0) {
        EmaTrend::Bullish(gap) => assert!(approx(gap, 1.0)),
        other => panic!("expected bullish, got {:?}", other),
    }
    assert!(matches!(EmaTrend::from_pair(99.0, 100.0), EmaTrend::Bearish(_)));
    assert_eq!(EmaTrend::from_pair(100.0, 100.0), EmaTrend::Flat);
}
