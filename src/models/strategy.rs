//! Strategy configuration: which decision table, risk sizing and gate to run.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::candle::Timeframe;
use super::indicators::IndicatorParams;
use crate::error::SignalError;

/// RSI vote table for the single-timeframe RSI/EMA strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RsiMode {
    /// Oversold/overbought only, weight 2.
    Strict { oversold: f64, overbought: f64 },
    /// Strong votes outside `lower..=upper` (weight 2), weak votes inside
    /// split at `midpoint` (weight 1).
    Loose { lower: f64, midpoint: f64, upper: f64 },
}

impl RsiMode {
    pub fn strict() -> Self {
        RsiMode::Strict {
            oversold: 30.0,
            overbought: 70.0,
        }
    }

    pub fn loose() -> Self {
        RsiMode::Loose {
            lower: 40.0,
            midpoint: 50.0,
            upper: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionVariant {
    /// Weighted RSI vote confirmed by the EMA trend.
    RsiEma { rsi_mode: RsiMode },
    /// RSI extreme that only stands when the EMA trend agrees.
    StrictConfirmation { oversold: f64, overbought: f64 },
    /// Trend agreement across several timeframes.
    MultiTimeframe {
        simplified: bool,
        min_agreement: usize,
        buy_rsi_max: f64,
        sell_rsi_min: f64,
    },
}

impl DecisionVariant {
    pub fn multi_timeframe(simplified: bool) -> Self {
        DecisionVariant::MultiTimeframe {
            simplified,
            min_agreement: 2,
            buy_rsi_max: 65.0,
            sell_rsi_min: 35.0,
        }
    }

    pub fn is_multi_timeframe(&self) -> bool {
        matches!(self, DecisionVariant::MultiTimeframe { .. })
    }
}

/// How take-profit and stop-loss are placed around the entry.
/// Percentages are fractions (`0.02` = 2%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RiskMode {
    FixedPercent {
        take_profit_pct: f64,
        stop_loss_pct: f64,
    },
    ConfidenceScaled {
        base_take_profit_pct: f64,
        take_profit_step_pct: f64,
        base_stop_loss_pct: f64,
        stop_loss_step_pct: f64,
    },
    Atr {
        take_profit_mult: f64,
        stop_loss_mult: f64,
    },
}

impl RiskMode {
    pub fn fixed() -> Self {
        RiskMode::FixedPercent {
            take_profit_pct: 0.02,
            stop_loss_pct: 0.01,
        }
    }

    pub fn fixed_tight() -> Self {
        RiskMode::FixedPercent {
            take_profit_pct: 0.015,
            stop_loss_pct: 0.01,
        }
    }

    pub fn confidence_scaled() -> Self {
        RiskMode::ConfidenceScaled {
            base_take_profit_pct: 0.015,
            take_profit_step_pct: 0.005,
            base_stop_loss_pct: 0.008,
            stop_loss_step_pct: 0.002,
        }
    }

    pub fn atr() -> Self {
        RiskMode::Atr {
            take_profit_mult: 3.0,
            stop_loss_mult: 1.5,
        }
    }
}

impl FromStr for RiskMode {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(RiskMode::fixed()),
            "fixed_tight" => Ok(RiskMode::fixed_tight()),
            "confidence" => Ok(RiskMode::confidence_scaled()),
            "atr" => Ok(RiskMode::atr()),
            other => Err(SignalError::Config(format!("unknown risk mode '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub enabled: bool,
    /// Number of trailing points replayed.
    pub test_periods: usize,
    /// Minimum candles available at a replayed point.
    pub min_history: usize,
    /// Signals below this accuracy (percent) are skipped.
    pub threshold_pct: f64,
    /// Also score HOLD predictions.
    pub score_hold: bool,
    pub min_move_pct: f64,
    pub hold_band_pct: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            test_periods: 20,
            min_history: 50,
            threshold_pct: 50.0,
            score_hold: false,
            min_move_pct: 0.1,
            hold_band_pct: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub variant: DecisionVariant,
    pub risk: RiskMode,
    pub indicators: IndicatorParams,
    /// Timeframes for multi-timeframe strategies; the first is primary.
    pub timeframes: Vec<Timeframe>,
    pub backtest: BacktestConfig,
    /// Candles requested per timeframe.
    pub candle_limit: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            variant: DecisionVariant::RsiEma {
                rsi_mode: RsiMode::loose(),
            },
            risk: RiskMode::confidence_scaled(),
            indicators: IndicatorParams::default(),
            timeframes: vec![
                Timeframe::FifteenMinutes,
                Timeframe::OneHour,
                Timeframe::FourHours,
            ],
            backtest: BacktestConfig::default(),
            candle_limit: 200,
        }
    }
}

impl StrategyConfig {
    /// Build a strategy from a preset name (`rsi_ema_loose`, `rsi_ema_strict`,
    /// `strict_confirmation`, `multi_timeframe`, `multi_timeframe_simple`).
    pub fn from_preset(name: &str) -> Result<Self, SignalError> {
        let variant = match name.trim().to_ascii_lowercase().as_str() {
            "rsi_ema_loose" => DecisionVariant::RsiEma {
                rsi_mode: RsiMode::loose(),
            },
            "rsi_ema_strict" => DecisionVariant::RsiEma {
                rsi_mode: RsiMode::strict(),
            },
            "strict_confirmation" => DecisionVariant::StrictConfirmation {
                oversold: 30.0,
                overbought: 70.0,
            },
            "multi_timeframe" => DecisionVariant::multi_timeframe(false),
            "multi_timeframe_simple" => DecisionVariant::multi_timeframe(true),
            other => {
                return Err(SignalError::Config(format!(
                    "unknown decision strategy '{}'",
                    other
                )))
            }
        };

        let mut config = StrategyConfig {
            variant,
            ..StrategyConfig::default()
        };
        match variant {
            DecisionVariant::StrictConfirmation { .. } => config.risk = RiskMode::fixed(),
            DecisionVariant::MultiTimeframe { .. } => config.risk = RiskMode::atr(),
            DecisionVariant::RsiEma { .. } => {}
        }
        Ok(config)
    }

    pub fn with_risk(mut self, risk: RiskMode) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_backtest(mut self, backtest: BacktestConfig) -> Self {
        self.backtest = backtest;
        self
    }

    pub fn with_timeframes(mut self, timeframes: Vec<Timeframe>) -> Self {
        self.timeframes = timeframes;
        self
    }

    /// Timeframes fetched for a request whose primary timeframe is `primary`.
    /// The primary replaces the configured one, so the set size is stable.
    pub fn timeframes_for(&self, primary: Timeframe) -> Vec<Timeframe> {
        if !self.variant.is_multi_timeframe() {
            return vec![primary];
        }
        let others = self.timeframes.len().saturating_sub(1);
        let mut frames = vec![primary];
        frames.extend(
            self.timeframes
                .iter()
                .copied()
                .filter(|tf| *tf != primary)
                .take(others),
        );
        frames
    }
}
