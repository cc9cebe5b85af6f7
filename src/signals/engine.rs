//! Turns per-timeframe candles into a finished [`Signal`].

use chrono::Utc;

use crate::common::math::round_to;
use crate::indicators;
use crate::indicators::trend::EmaTrend;
use crate::models::candle::{Candle, Timeframe};
use crate::models::signal::{BacktestResult, Decision, Signal, TimeframeAnalysis, Trend};
use crate::models::strategy::{RiskMode, StrategyConfig};

use super::backtest;
use super::decision::{DecisionEngine, DecisionOutcome};
use super::risk::StopLossTakeProfit;

#[derive(Debug, Clone)]
pub struct SignalEngine {
    strategy: StrategyConfig,
    decision: DecisionEngine,
}

impl SignalEngine {
    pub fn new(strategy: StrategyConfig) -> Self {
        let decision = DecisionEngine::new(strategy.variant);
        Self { strategy, decision }
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn analyze_timeframe(
        &self,
        timeframe: Timeframe,
        candles: &[Candle],
        current_price: f64,
    ) -> TimeframeAnalysis {
        let snapshot = indicators::snapshot(candles, &self.strategy.indicators);
        let trend = match (snapshot.ema_fast, snapshot.ema_slow) {
            (Some(fast), Some(slow)) => match EmaTrend::from_pair(fast, slow) {
                EmaTrend::Bullish(_) => Some(Trend::Bullish),
                EmaTrend::Bearish(_) => Some(Trend::Bearish),
                EmaTrend::Flat => None,
            },
            _ => None,
        };

        TimeframeAnalysis {
            timeframe,
            snapshot,
            trend,
            current_price,
        }
    }

    /// Decide on the analyses (primary first) and attach risk levels.
    /// A multi-timeframe vote without enough valid timeframes becomes HOLD.
    pub fn build_signal(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        analyses: &[TimeframeAnalysis],
        entry_price: f64,
    ) -> Signal {
        let outcome = self
            .decision
            .decide(analyses)
            .unwrap_or_else(|err| DecisionOutcome {
                decision: Decision::Hold,
                confidence: 0.0,
                reasons: vec![err.to_string()],
                summary: None,
            });

        let snapshot = analyses
            .first()
            .map(|analysis| analysis.snapshot)
            .unwrap_or_default();

        let mut reasons = outcome.reasons;
        let levels = StopLossTakeProfit::calculate(
            &self.strategy.risk,
            outcome.decision,
            entry_price,
            outcome.confidence,
            snapshot.atr,
        );
        if outcome.decision != Decision::Hold
            && levels.take_profit.is_none()
            && matches!(self.strategy.risk, RiskMode::Atr { .. })
        {
            match snapshot.atr {
                Some(atr) if atr > 0.0 => reasons.push(format!(
                    "ATR {:.6} too wide for entry {:.6}, no take-profit/stop-loss set",
                    atr, entry_price
                )),
                _ => reasons.push("ATR unavailable, no take-profit/stop-loss set".to_string()),
            }
        }

        let timeframes_analyzed = if self.strategy.variant.is_multi_timeframe() {
            analyses.iter().map(|analysis| analysis.timeframe).collect()
        } else {
            Vec::new()
        };

        Signal {
            symbol: symbol.to_string(),
            decision: outcome.decision,
            confidence: round_to(outcome.confidence, 2),
            reasons,
            entry_price,
            take_profit: levels.take_profit,
            stop_loss: levels.stop_loss,
            timestamp: Utc::now(),
            timeframe,
            indicators: snapshot,
            timeframe_analysis: outcome.summary,
            timeframes_analyzed,
            accuracy: None,
        }
    }

    /// Replay accuracy on the primary timeframe's candles.
    pub fn backtest(&self, candles: &[Candle]) -> BacktestResult {
        backtest::run(
            candles,
            &self.decision,
            &self.strategy.indicators,
            &self.strategy.backtest,
        )
    }
}
