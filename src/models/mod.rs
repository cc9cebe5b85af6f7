//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod signal;
pub mod strategy;

pub use candle::{Candle, Timeframe};
pub use indicators::{IndicatorParams, IndicatorSnapshot};
pub use signal::{
    BacktestResult, BatchReport, Decision, Signal, SignalOutcome, TimeframeAnalysis,
    TimeframeSummary, Trend,
};
pub use strategy::{BacktestConfig, DecisionVariant, RiskMode, RsiMode, StrategyConfig};
