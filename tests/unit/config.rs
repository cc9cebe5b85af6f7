//! Unit tests for environment configuration

use std::collections::HashMap;
use std::time::Duration;

use lucky_signals::config::{AppConfig, DEFAULT_WATCHLIST};
use lucky_signals::error::SignalError;
use lucky_signals::models::{RiskMode, Timeframe};

fn load(vars: &[(&str, &str)]) -> Result<AppConfig, SignalError> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    let config = load(&[]).expect("defaults");
    assert_eq!(config.port, 8080);
    assert_eq!(config.timeframe, Timeframe::FifteenMinutes);
    assert_eq!(config.eval_interval, Duration::from_secs(900));
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert_eq!(config.concurrency, 10);
    assert_eq!(config.watchlist.len(), DEFAULT_WATCHLIST.len());
    assert!(!config.auto_signals);
    assert!(config.telegram.is_none());
    assert!(!config.is_production());
}

#[test]
fn overrides_are_applied() {
    let config = load(&[
        ("APP_ENV", "production"),
        ("PORT", "9090"),
        ("SYMBOLS", "btc/usdt, eth_usdt"),
        ("SIGNAL_TIMEFRAME", "1hour"),
        ("AUTO_SIGNALS", "true"),
        ("DECISION_STRATEGY", "multi_timeframe"),
        ("RISK_MODE", "fixed"),
        ("ACCURACY_THRESHOLD", "60"),
        ("TELEGRAM_BOT_TOKEN", "token"),
        ("TELEGRAM_CHAT_ID", "42"),
    ])
    .expect("valid overrides");

    assert!(config.is_production());
    assert_eq!(config.port, 9090);
    assert_eq!(config.watchlist, vec!["BTC-USDT", "ETH-USDT"]);
    assert_eq!(config.timeframe, Timeframe::OneHour);
    assert!(config.auto_signals);
    assert!(config.strategy.variant.is_multi_timeframe());
    assert_eq!(config.strategy.risk, RiskMode::fixed());
    assert_eq!(config.strategy.backtest.threshold_pct, 60.0);

    let telegram = config.telegram.expect("telegram configured");
    assert_eq!(telegram.chat_id, "42");
    assert_eq!(telegram.api_base, "https://api.telegram.org");
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        load(&[("SIGNAL_TIMEFRAME", "7min")]),
        Err(SignalError::InvalidTimeframe(_))
    ));
    assert!(matches!(
        load(&[("PORT", "eighty")]),
        Err(SignalError::Config(_))
    ));
    assert!(matches!(
        load(&[("TELEGRAM_BOT_TOKEN", "token")]),
        Err(SignalError::Config(_))
    ));
}

#[test]
fn multi_timeframe_set_comes_from_environment() {
    let config = load(&[
        ("DECISION_STRATEGY", "multi_timeframe"),
        ("SIGNAL_TIMEFRAMES", "1hour, 4hour,1day"),
    ])
    .expect("valid timeframes");
    assert_eq!(
        config.strategy.timeframes,
        vec![Timeframe::OneHour, Timeframe::FourHours, Timeframe::OneDay]
    );
    assert_eq!(
        config.strategy.timeframes_for(Timeframe::FifteenMinutes),
        vec![Timeframe::FifteenMinutes, Timeframe::OneHour, Timeframe::FourHours]
    );

    assert!(matches!(
        load(&[("SIGNAL_TIMEFRAMES", "1hour,7min")]),
        Err(SignalError::InvalidTimeframe(_))
    ));
    assert!(matches!(
        load(&[("SIGNAL_TIMEFRAMES", " , ")]),
        Err(SignalError::Config(_))
    ));
}
