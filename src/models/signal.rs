use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::candle::Timeframe;
use super::indicators::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Buy => "BUY",
            Decision::Sell => "SELL",
            Decision::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Bullish,
    Bearish,
}

/// Indicators evaluated on one timeframe for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    pub timeframe: Timeframe,
    pub snapshot: IndicatorSnapshot,
    /// `None` when the EMAs are undefined or equal.
    pub trend: Option<Trend>,
    pub current_price: f64,
}

/// Agreement counts across the analysed timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeSummary {
    pub bullish_timeframes: usize,
    pub bearish_timeframes: usize,
    pub total_timeframes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    #[serde(rename = "signal")]
    pub decision: Decision,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub entry_price: f64,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub timeframe: Timeframe,
    pub indicators: IndicatorSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_analysis: Option<TimeframeSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub timeframes_analyzed: Vec<Timeframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Replay hit-rate used by the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub accuracy_pct: f64,
    pub sample_count: usize,
    pub correct_count: usize,
}

impl BacktestResult {
    pub fn empty() -> Self {
        Self {
            accuracy_pct: 0.0,
            sample_count: 0,
            correct_count: 0,
        }
    }
}

/// Per-symbol result of an orchestrated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignalOutcome {
    Emitted(Signal),
    Skipped {
        symbol: String,
        accuracy: f64,
        reason: String,
    },
    Failed {
        symbol: String,
        error: String,
    },
}

impl SignalOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            SignalOutcome::Emitted(signal) => &signal.symbol,
            SignalOutcome::Skipped { symbol, .. } | SignalOutcome::Failed { symbol, .. } => symbol,
        }
    }

    pub fn signal(&self) -> Option<&Signal> {
        match self {
            SignalOutcome::Emitted(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Batch outcomes split by kind, each list ordered by symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub signals: Vec<Signal>,
    pub skipped: Vec<SignalOutcome>,
    pub errors: Vec<SignalOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<SignalOutcome>) -> Self {
        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                SignalOutcome::Emitted(signal) => report.signals.push(signal),
                skipped @ SignalOutcome::Skipped { .. } => report.skipped.push(skipped),
                failed @ SignalOutcome::Failed { .. } => report.errors.push(failed),
            }
        }
        report
    }

    pub fn actionable(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.decision != Decision::Hold)
    }
}
