//! Environment-driven configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SignalError;
use crate::models::candle::Timeframe;
use crate::models::strategy::{RiskMode, StrategyConfig};
use crate::services::kucoin::DEFAULT_API_BASE;
use crate::services::notifier::telegram::DEFAULT_TELEGRAM_API_BASE;

/// Pairs analysed by batch runs unless `SYMBOLS` overrides them.
pub const DEFAULT_WATCHLIST: [&str; 20] = [
    "BTC-USDT", "ETH-USDT", "BNB-USDT", "XRP-USDT", "ADA-USDT", "DOGE-USDT", "SOL-USDT",
    "MATIC-USDT", "DOT-USDT", "AVAX-USDT", "UNI-USDT", "LINK-USDT", "LTC-USDT", "ATOM-USDT",
    "BCH-USDT", "NEAR-USDT", "FTT-USDT", "ALGO-USDT", "XLM-USDT", "ICP-USDT",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub kucoin_api_base: String,
    pub http_timeout: Duration,
    pub watchlist: Vec<String>,
    pub timeframe: Timeframe,
    pub eval_interval: Duration,
    pub auto_signals: bool,
    pub concurrency: usize,
    pub strategy: StrategyConfig,
    pub telegram: Option<TelegramConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: 8080,
            kucoin_api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(10),
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            timeframe: Timeframe::FifteenMinutes,
            eval_interval: Duration::from_secs(900),
            auto_signals: false,
            concurrency: 10,
            strategy: StrategyConfig::default(),
            telegram: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, SignalError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SignalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = AppConfig::default();

        if let Some(env_name) = get("APP_ENV") {
            config.environment = env_name;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(base) = get("KUCOIN_API_BASE") {
            config.kucoin_api_base = base;
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECONDS") {
            config.http_timeout = Duration::from_secs(parse("HTTP_TIMEOUT_SECONDS", &secs)?);
        }
        if let Some(symbols) = get("SYMBOLS") {
            let list: Vec<String> = symbols
                .split(',')
                .map(crate::services::market_data::normalize_symbol)
                .filter(|s| !s.is_empty())
                .collect();
            if list.is_empty() {
                return Err(SignalError::Config("SYMBOLS is empty".to_string()));
            }
            config.watchlist = list;
        }
        if let Some(tf) = get("SIGNAL_TIMEFRAME") {
            config.timeframe = Timeframe::from_str(&tf)?;
        }
        if let Some(secs) = get("EVAL_INTERVAL_SECONDS") {
            config.eval_interval = Duration::from_secs(parse("EVAL_INTERVAL_SECONDS", &secs)?);
        }
        if let Some(flag) = get("AUTO_SIGNALS") {
            config.auto_signals = parse_bool("AUTO_SIGNALS", &flag)?;
        }
        if let Some(n) = get("WORKER_CONCURRENCY") {
            config.concurrency = parse::<usize>("WORKER_CONCURRENCY", &n)?.max(1);
        }

        if let Some(preset) = get("DECISION_STRATEGY") {
            config.strategy = StrategyConfig::from_preset(&preset)?;
        }
        if let Some(mode) = get("RISK_MODE") {
            config.strategy.risk = RiskMode::from_str(&mode)?;
        }
        if let Some(threshold) = get("ACCURACY_THRESHOLD") {
            config.strategy.backtest.threshold_pct = parse("ACCURACY_THRESHOLD", &threshold)?;
        }
        if let Some(list) = get("SIGNAL_TIMEFRAMES") {
            let timeframes = list
                .split(',')
                .map(str::trim)
                .filter(|tf| !tf.is_empty())
                .map(Timeframe::from_str)
                .collect::<Result<Vec<_>, _>>()?;
            if timeframes.is_empty() {
                return Err(SignalError::Config("SIGNAL_TIMEFRAMES is empty".to_string()));
            }
            config.strategy = config.strategy.with_timeframes(timeframes);
        }
        if let Some(flag) = get("BACKTEST_ENABLED") {
            config.strategy.backtest.enabled = parse_bool("BACKTEST_ENABLED", &flag)?;
        }

        config.telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                api_base: get("TELEGRAM_API_BASE")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(SignalError::Config(
                    "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".to_string(),
                ))
            }
        };

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, SignalError> {
    value
        .parse::<T>()
        .map_err(|_| SignalError::Config(format!("invalid value for {}: '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SignalError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SignalError::Config(format!(
            "invalid boolean for {}: '{}'",
            key, value
        ))),
    }
}
