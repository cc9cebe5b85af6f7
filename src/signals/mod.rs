//! Signal decisions, risk levels and replay accuracy.

pub mod backtest;
pub mod decision;
pub mod engine;
pub mod risk;

pub use decision::{DecisionEngine, DecisionOutcome};
pub use engine::SignalEngine;
pub use risk::{RiskLevels, StopLossTakeProfit};
