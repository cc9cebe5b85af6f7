//! Unit tests for strategy configuration

use lucky_signals::models::{DecisionVariant, RiskMode, RsiMode, StrategyConfig, Timeframe};

#[test]
fn default_strategy_is_loose_rsi_ema_with_confidence_risk() {
    let strategy = StrategyConfig::default();
    assert_eq!(
        strategy.variant,
        DecisionVariant::RsiEma {
            rsi_mode: RsiMode::loose()
        }
    );
    assert_eq!(strategy.risk, RiskMode::confidence_scaled());
    assert!(strategy.backtest.enabled);
    assert_eq!(strategy.backtest.threshold_pct, 50.0);
}

#[test]
fn presets_select_variant_and_risk() {
    let strict = StrategyConfig::from_preset("strict_confirmation").expect("preset");
    assert_eq!(strict.risk, RiskMode::fixed());

    let multi = StrategyConfig::from_preset("MULTI_TIMEFRAME").expect("preset");
    assert!(multi.variant.is_multi_timeframe());
    assert_eq!(multi.risk, RiskMode::atr());

    assert!(StrategyConfig::from_preset("martingale").is_err());
}

#[test]
fn single_timeframe_variants_only_fetch_the_primary() {
    let strategy = StrategyConfig::default();
    assert_eq!(
        strategy.timeframes_for(Timeframe::OneHour),
        vec![Timeframe::OneHour]
    );
}

#[test]
fn multi_timeframe_puts_requested_primary_first() {
    let strategy = StrategyConfig::from_preset("multi_timeframe").expect("preset");
    assert_eq!(
        strategy.timeframes_for(Timeframe::FifteenMinutes),
        vec![
            Timeframe::FifteenMinutes,
            Timeframe::OneHour,
            Timeframe::FourHours
        ]
    );
    assert_eq!(
        strategy.timeframes_for(Timeframe::OneHour),
        vec![
            Timeframe::OneHour,
            Timeframe::FifteenMinutes,
            Timeframe::FourHours
        ]
    );
    assert_eq!(
        strategy.timeframes_for(Timeframe::OneDay),
        vec![
            Timeframe::OneDay,
            Timeframe::FifteenMinutes,
            Timeframe::OneHour
        ]
    );
}

#[test]
fn risk_modes_parse_by_name() {
    assert_eq!("fixed".parse::<RiskMode>().expect("mode"), RiskMode::fixed());
    assert_eq!(
        "fixed_tight".parse::<RiskMode>().expect("mode"),
        RiskMode::fixed_tight()
    );
    assert_eq!(" ATR ".parse::<RiskMode>().expect("mode"), RiskMode::atr());
    assert!("kelly".parse::<RiskMode>().is_err());
}
