//! Unit tests for the decision engine

use lucky_signals::error::SignalError;
use lucky_signals::models::{
    Decision, DecisionVariant, IndicatorSnapshot, RsiMode, Timeframe, TimeframeAnalysis, Trend,
};
use lucky_signals::signals::DecisionEngine;

fn snapshot(rsi: Option<f64>, fast: Option<f64>, slow: Option<f64>) -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi,
        ema_fast: fast,
        ema_slow: slow,
        atr: None,
    }
}

fn analysis(
    timeframe: Timeframe,
    snapshot: IndicatorSnapshot,
    trend: Option<Trend>,
    price: f64,
) -> TimeframeAnalysis {
    TimeframeAnalysis {
        timeframe,
        snapshot,
        trend,
        current_price: price,
    }
}

fn loose() -> DecisionEngine {
    DecisionEngine::new(DecisionVariant::RsiEma {
        rsi_mode: RsiMode::loose(),
    })
}

fn strict() -> DecisionEngine {
    DecisionEngine::new(DecisionVariant::RsiEma {
        rsi_mode: RsiMode::strict(),
    })
}

#[test]
fn oversold_rsi_with_strong_uptrend_is_buy() {
    let outcome = loose().decide_single(&snapshot(Some(25.0), Some(101.0), Some(100.0)));
    assert_eq!(outcome.decision, Decision::Buy);
    assert!(outcome.confidence >= 3.0);
    assert_eq!(outcome.reasons.len(), 2);
    assert!(outcome.reasons[0].starts_with("RSI oversold"));
    assert!(outcome.reasons[1].starts_with("EMA bullish trend"));
}

#[test]
fn overbought_rsi_with_strong_downtrend_is_sell() {
    let outcome = strict().decide_single(&snapshot(Some(75.0), Some(98.0), Some(100.0)));
    assert_eq!(outcome.decision, Decision::Sell);
    assert_eq!(outcome.confidence, 3.0);
}

#[test]
fn ema_overrides_weak_opposite_rsi() {
    // weak SELL (1) against strong EMA BUY (1): no agreement, EMA wins at 2
    let outcome = loose().decide_single(&snapshot(Some(55.0), Some(101.0), Some(100.0)));
    assert_eq!(outcome.decision, Decision::Buy);
    assert_eq!(outcome.confidence, 2.0);
}

#[test]
fn strong_rsi_against_weak_ema_still_follows_ema() {
    // strong SELL (2) plus weak EMA BUY (0.5) = 2.5: below 3, EMA branch applies
    let outcome = loose().decide_single(&snapshot(Some(65.0), Some(100.2), Some(100.0)));
    assert_eq!(outcome.decision, Decision::Buy);
    assert_eq!(outcome.confidence, 2.5);
}

#[test]
fn neutral_strict_rsi_with_trend_holds() {
    let outcome = strict().decide_single(&snapshot(Some(50.0), Some(101.0), Some(100.0)));
    assert_eq!(outcome.decision, Decision::Hold);
    assert_eq!(outcome.confidence, 1.0);
}

#[test]
fn undefined_indicators_abstain() {
    let outcome = loose().decide_single(&IndicatorSnapshot::default());
    assert_eq!(outcome.decision, Decision::Hold);
    assert_eq!(outcome.confidence, 0.0);
    assert!(outcome.reasons.is_empty());
}

#[test]
fn strict_confirmation_requires_trend_agreement() {
    let engine = DecisionEngine::new(DecisionVariant::StrictConfirmation {
        oversold: 30.0,
        overbought: 70.0,
    });

    let confirmed = engine.decide_single(&snapshot(Some(25.0), Some(101.0), Some(100.0)));
    assert_eq!(confirmed.decision, Decision::Buy);
    assert_eq!(confirmed.confidence, 2.0);

    let rejected = engine.decide_single(&snapshot(Some(25.0), Some(99.0), Some(100.0)));
    assert_eq!(rejected.decision, Decision::Hold);

    let no_trend = engine.decide_single(&snapshot(Some(75.0), None, None));
    assert_eq!(no_trend.decision, Decision::Sell);
    assert_eq!(no_trend.confidence, 1.0);
}

#[test]
fn single_timeframe_decide_requires_an_analysis() {
    let err = loose().decide(&[]).unwrap_err();
    assert!(matches!(err, SignalError::InsufficientData { .. }));
}

#[test]
fn multi_timeframe_buys_on_majority_with_price_above_fast_ema() {
    let engine = DecisionEngine::new(DecisionVariant::multi_timeframe(false));
    let analyses = vec![
        analysis(
            Timeframe::FifteenMinutes,
            snapshot(Some(50.0), Some(100.0), Some(99.0)),
            Some(Trend::Bullish),
            102.0,
        ),
        analysis(
            Timeframe::OneHour,
            snapshot(Some(55.0), Some(100.0), Some(98.0)),
            Some(Trend::Bullish),
            102.0,
        ),
        analysis(
            Timeframe::FourHours,
            snapshot(Some(45.0), Some(100.0), Some(101.0)),
            Some(Trend::Bearish),
            102.0,
        ),
    ];

    let outcome = engine.decide(&analyses).expect("three valid timeframes");
    assert_eq!(outcome.decision, Decision::Buy);
    assert!((outcome.confidence - 2.0 / 3.0).abs() < 1e-12);

    let summary = outcome.summary.expect("summary attached");
    assert_eq!(summary.bullish_timeframes, 2);
    assert_eq!(summary.bearish_timeframes, 1);
    assert_eq!(summary.total_timeframes, 3);
}

#[test]
fn multi_timeframe_holds_when_price_below_fast_ema() {
    let engine = DecisionEngine::new(DecisionVariant::multi_timeframe(false));
    let analyses = vec![
        analysis(
            Timeframe::FifteenMinutes,
            snapshot(Some(50.0), Some(100.0), Some(99.0)),
            Some(Trend::Bullish),
            99.5,
        ),
        analysis(
            Timeframe::OneHour,
            snapshot(Some(50.0), Some(100.0), Some(99.0)),
            Some(Trend::Bullish),
            99.5,
        ),
    ];

    let outcome = engine.decide(&analyses).expect("two valid timeframes");
    assert_eq!(outcome.decision, Decision::Hold);
    assert_eq!(outcome.confidence, 1.0);
}

#[test]
fn multi_timeframe_fails_with_fewer_than_two_valid_timeframes() {
    let engine = DecisionEngine::new(DecisionVariant::multi_timeframe(false));
    let analyses = vec![
        analysis(
            Timeframe::FifteenMinutes,
            snapshot(Some(50.0), Some(100.0), Some(99.0)),
            Some(Trend::Bullish),
            101.0,
        ),
        analysis(Timeframe::OneHour, IndicatorSnapshot::default(), None, 101.0),
        analysis(Timeframe::FourHours, IndicatorSnapshot::default(), None, 101.0),
    ];

    match engine.decide(&analyses) {
        Err(SignalError::InsufficientData {
            required,
            available,
        }) => {
            assert_eq!(required, 2);
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn simplified_multi_timeframe_uses_rsi_midpoint() {
    let engine = DecisionEngine::new(DecisionVariant::multi_timeframe(true));
    let analyses = vec![
        analysis(
            Timeframe::FifteenMinutes,
            snapshot(Some(58.0), Some(99.0), Some(100.0)),
            Some(Trend::Bearish),
            98.0,
        ),
        analysis(
            Timeframe::OneHour,
            snapshot(Some(60.0), Some(99.0), Some(100.0)),
            Some(Trend::Bearish),
            98.0,
        ),
    ];

    let outcome = engine.decide(&analyses).expect("two valid timeframes");
    assert_eq!(outcome.decision, Decision::Sell);
    assert_eq!(outcome.confidence, 1.0);
}
