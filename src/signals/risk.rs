//! Take-profit / stop-loss placement

use crate::common::math::round_to;
use crate::models::signal::Decision;
use crate::models::strategy::RiskMode;

/// Output prices are rounded to this many decimals.
pub const PRICE_DECIMALS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLevels {
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl RiskLevels {
    pub const NONE: RiskLevels = RiskLevels {
        take_profit: None,
        stop_loss: None,
    };
}

pub struct StopLossTakeProfit;

impl StopLossTakeProfit {
    /// Levels for a decided signal. HOLD never gets levels; ATR mode without
    /// an ATR value yields none either, as does any level that would not be
    /// a positive price.
    pub fn calculate(
        mode: &RiskMode,
        decision: Decision,
        entry: f64,
        confidence: f64,
        atr: Option<f64>,
    ) -> RiskLevels {
        let side = match decision {
            Decision::Buy => 1.0,
            Decision::Sell => -1.0,
            Decision::Hold => return RiskLevels::NONE,
        };

        let (tp_distance, sl_distance) = match *mode {
            RiskMode::FixedPercent {
                take_profit_pct,
                stop_loss_pct,
            } => (entry * take_profit_pct, entry * stop_loss_pct),
            RiskMode::ConfidenceScaled { .. } => {
                let (tp_pct, sl_pct) = Self::scaled_pcts(mode, confidence);
                (entry * tp_pct, entry * sl_pct)
            }
            RiskMode::Atr {
                take_profit_mult,
                stop_loss_mult,
            } => match atr {
                Some(atr) if atr > 0.0 => (atr * take_profit_mult, atr * stop_loss_mult),
                _ => return RiskLevels::NONE,
            },
        };

        let take_profit = round_to(entry + side * tp_distance, PRICE_DECIMALS);
        let stop_loss = round_to(entry - side * sl_distance, PRICE_DECIMALS);
        // a distance wider than the entry would put a level at or below zero
        if take_profit <= 0.0 || stop_loss <= 0.0 {
            return RiskLevels::NONE;
        }

        RiskLevels {
            take_profit: Some(take_profit),
            stop_loss: Some(stop_loss),
        }
    }

    /// Take-profit and stop-loss fractions for a confidence-scaled mode.
    /// Other modes return their fixed fractions, or zero for ATR.
    pub fn scaled_pcts(mode: &RiskMode, confidence: f64) -> (f64, f64) {
        match *mode {
            RiskMode::ConfidenceScaled {
                base_take_profit_pct,
                take_profit_step_pct,
                base_stop_loss_pct,
                stop_loss_step_pct,
            } => (
                base_take_profit_pct + confidence * take_profit_step_pct,
                base_stop_loss_pct + confidence * stop_loss_step_pct,
            ),
            RiskMode::FixedPercent {
                take_profit_pct,
                stop_loss_pct,
            } => (take_profit_pct, stop_loss_pct),
            RiskMode::Atr { .. } => (0.0, 0.0),
        }
    }
}
