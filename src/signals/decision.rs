//! Categorical BUY/SELL/HOLD decisions from indicator snapshots.
//!
//! Every call is independent: the engine holds configuration only. Reasons are
//! appended in evaluation order and are meant for display.

use crate::error::{Result, SignalError};
use crate::indicators::trend::EmaTrend;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{Decision, TimeframeAnalysis, TimeframeSummary, Trend};
use crate::models::strategy::{DecisionVariant, RsiMode};

/// Timeframes with a defined trend needed for a multi-timeframe vote.
pub const MIN_VALID_TIMEFRAMES: usize = 2;

/// EMA gap (percent of the slow EMA) above which the trend vote counts fully.
pub const EMA_STRONG_GAP_PCT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub summary: Option<TimeframeSummary>,
}

impl DecisionOutcome {
    fn new(decision: Decision, confidence: f64, reasons: Vec<String>) -> Self {
        Self {
            decision,
            confidence,
            reasons,
            summary: None,
        }
    }
}

/// A directional vote with its weight. `Hold` votes carry no weight.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Vote {
    decision: Decision,
    weight: f64,
}

impl Vote {
    const ABSTAIN: Vote = Vote {
        decision: Decision::Hold,
        weight: 0.0,
    };

    fn new(decision: Decision, weight: f64) -> Self {
        Self { decision, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionEngine {
    variant: DecisionVariant,
}

impl DecisionEngine {
    pub fn new(variant: DecisionVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> DecisionVariant {
        self.variant
    }

    /// Decide from per-timeframe analyses; the first analysis is the primary
    /// timeframe. Single-timeframe variants only look at the primary.
    pub fn decide(&self, analyses: &[TimeframeAnalysis]) -> Result<DecisionOutcome> {
        match self.variant {
            DecisionVariant::MultiTimeframe {
                simplified,
                min_agreement,
                buy_rsi_max,
                sell_rsi_min,
            } => multi_timeframe(analyses, simplified, min_agreement, buy_rsi_max, sell_rsi_min),
            _ => {
                let primary = analyses.first().ok_or(SignalError::InsufficientData {
                    required: 1,
                    available: 0,
                })?;
                Ok(self.decide_single(&primary.snapshot))
            }
        }
    }

    /// Single-timeframe decision. Multi-timeframe configurations fall back to
    /// the loose RSI/EMA table here, which is what backtest replays use.
    pub fn decide_single(&self, snapshot: &IndicatorSnapshot) -> DecisionOutcome {
        match self.variant {
            DecisionVariant::RsiEma { rsi_mode } => rsi_ema(snapshot, rsi_mode),
            DecisionVariant::StrictConfirmation {
                oversold,
                overbought,
            } => strict_confirmation(snapshot, oversold, overbought),
            DecisionVariant::MultiTimeframe { .. } => rsi_ema(snapshot, RsiMode::loose()),
        }
    }
}

fn rsi_vote(rsi: Option<f64>, mode: RsiMode, reasons: &mut Vec<String>) -> Vote {
    let Some(rsi) = rsi else {
        return Vote::ABSTAIN;
    };

    match mode {
        RsiMode::Strict {
            oversold,
            overbought,
        } => {
            if rsi < oversold {
                reasons.push(format!("RSI oversold ({:.1})", rsi));
                Vote::new(Decision::Buy, 2.0)
            } else if rsi > overbought {
                reasons.push(format!("RSI overbought ({:.1})", rsi));
                Vote::new(Decision::Sell, 2.0)
            } else {
                Vote::ABSTAIN
            }
        }
        RsiMode::Loose {
            lower,
            midpoint,
            upper,
        } => {
            if rsi < lower {
                reasons.push(format!("RSI oversold ({:.1})", rsi));
                Vote::new(Decision::Buy, 2.0)
            } else if rsi > upper {
                reasons.push(format!("RSI overbought ({:.1})", rsi));
                Vote::new(Decision::Sell, 2.0)
            } else if rsi <= midpoint {
                reasons.push(format!("RSI neutral-bullish ({:.1})", rsi));
                Vote::new(Decision::Buy, 1.0)
            } else {
                reasons.push(format!("RSI neutral-bearish ({:.1})", rsi));
                Vote::new(Decision::Sell, 1.0)
            }
        }
    }
}

fn ema_vote(snapshot: &IndicatorSnapshot, reasons: &mut Vec<String>) -> Vote {
    let (Some(fast), Some(slow)) = (snapshot.ema_fast, snapshot.ema_slow) else {
        return Vote::ABSTAIN;
    };

    let weight_for = |gap_pct: f64| {
        if gap_pct.abs() > EMA_STRONG_GAP_PCT {
            1.0
        } else {
            0.5
        }
    };

    match EmaTrend::from_pair(fast, slow) {
        EmaTrend::Bullish(gap) => {
            reasons.push(format!("EMA bullish trend ({:.2}%)", gap));
            Vote::new(Decision::Buy, weight_for(gap))
        }
        EmaTrend::Bearish(gap) => {
            reasons.push(format!("EMA bearish trend ({:.2}%)", gap));
            Vote::new(Decision::Sell, weight_for(gap))
        }
        EmaTrend::Flat => Vote::ABSTAIN,
    }
}

/// RSI vote weighted with EMA confirmation. The fall-through order is part of
/// the strategy: agreement, strong RSI, EMA trend, weak RSI, hold.
fn rsi_ema(snapshot: &IndicatorSnapshot, mode: RsiMode) -> DecisionOutcome {
    let mut reasons = Vec::new();
    let rsi = rsi_vote(snapshot.rsi, mode, &mut reasons);
    let ema = ema_vote(snapshot, &mut reasons);
    let confidence = rsi.weight + ema.weight;

    let decision = if rsi.decision == ema.decision && confidence >= 2.0 {
        rsi.decision
    } else if confidence >= 3.0 {
        rsi.decision
    } else if ema.decision != Decision::Hold && confidence >= 1.5 {
        ema.decision
    } else if confidence >= 1.0 {
        rsi.decision
    } else {
        Decision::Hold
    };

    DecisionOutcome::new(decision, confidence, reasons)
}

/// RSI extreme confirmed by the EMA trend; without EMAs the RSI vote stands.
fn strict_confirmation(
    snapshot: &IndicatorSnapshot,
    oversold: f64,
    overbought: f64,
) -> DecisionOutcome {
    let mut reasons = Vec::new();
    let rsi = rsi_vote(
        snapshot.rsi,
        RsiMode::Strict {
            oversold,
            overbought,
        },
        &mut reasons,
    );

    let (decision, confidence) = match (snapshot.ema_fast, snapshot.ema_slow) {
        (Some(fast), Some(slow)) => {
            let confirmed = match rsi.decision {
                Decision::Buy => fast > slow,
                Decision::Sell => fast < slow,
                Decision::Hold => false,
            };
            if confirmed {
                reasons.push(format!("EMA confirms {}", rsi.decision));
                (rsi.decision, 2.0)
            } else {
                if rsi.decision != Decision::Hold {
                    reasons.push(format!("EMA does not confirm {}", rsi.decision));
                }
                (Decision::Hold, 0.0)
            }
        }
        _ => {
            let confidence = if rsi.decision == Decision::Hold { 0.0 } else { 1.0 };
            (rsi.decision, confidence)
        }
    };

    DecisionOutcome::new(decision, confidence, reasons)
}

fn multi_timeframe(
    analyses: &[TimeframeAnalysis],
    simplified: bool,
    min_agreement: usize,
    buy_rsi_max: f64,
    sell_rsi_min: f64,
) -> Result<DecisionOutcome> {
    let mut reasons = Vec::new();
    let mut bullish = 0;
    let mut bearish = 0;

    for analysis in analyses {
        match analysis.trend {
            Some(Trend::Bullish) => {
                bullish += 1;
                reasons.push(format!("{}: bullish (EMA fast above slow)", analysis.timeframe));
            }
            Some(Trend::Bearish) => {
                bearish += 1;
                reasons.push(format!("{}: bearish (EMA fast below slow)", analysis.timeframe));
            }
            None => reasons.push(format!("{}: insufficient data", analysis.timeframe)),
        }
    }

    let valid = bullish + bearish;
    if valid < MIN_VALID_TIMEFRAMES {
        return Err(SignalError::InsufficientData {
            required: MIN_VALID_TIMEFRAMES,
            available: valid,
        });
    }

    reasons.push(format!(
        "{}/{} timeframes bullish, {}/{} bearish",
        bullish, valid, bearish, valid
    ));

    let primary = &analyses[0];
    let snapshot = &primary.snapshot;
    let price = primary.current_price;

    let decision = match (snapshot.rsi, snapshot.ema_fast, snapshot.ema_slow) {
        (Some(rsi), Some(fast), Some(slow)) if simplified => {
            if rsi < 50.0 && fast > slow {
                reasons.push(format!("RSI {:.1} below 50 with EMA fast above slow", rsi));
                Decision::Buy
            } else if rsi > 50.0 && fast < slow {
                reasons.push(format!("RSI {:.1} above 50 with EMA fast below slow", rsi));
                Decision::Sell
            } else {
                reasons.push(format!("RSI {:.1} does not align with EMA trend", rsi));
                Decision::Hold
            }
        }
        (Some(rsi), Some(fast), _) if !simplified => {
            if bullish >= min_agreement && rsi < buy_rsi_max && price > fast {
                reasons.push(format!("RSI {:.1} below {:.0}", rsi, buy_rsi_max));
                reasons.push(format!("Price {:.6} above EMA fast {:.6}", price, fast));
                Decision::Buy
            } else if bearish >= min_agreement && rsi > sell_rsi_min && price < fast {
                reasons.push(format!("RSI {:.1} above {:.0}", rsi, sell_rsi_min));
                reasons.push(format!("Price {:.6} below EMA fast {:.6}", price, fast));
                Decision::Sell
            } else {
                reasons.push(format!(
                    "No confirmation: RSI {:.1}, price {:.6}, EMA fast {:.6}",
                    rsi, price, fast
                ));
                Decision::Hold
            }
        }
        _ => {
            reasons.push(format!("{}: RSI/EMA undefined", primary.timeframe));
            Decision::Hold
        }
    };

    let confidence = bullish.max(bearish) as f64 / valid as f64;
    Ok(DecisionOutcome {
        decision,
        confidence,
        reasons,
        summary: Some(TimeframeSummary {
            bullish_timeframes: bullish,
            bearish_timeframes: bearish,
            total_timeframes: valid,
        }),
    })
}
