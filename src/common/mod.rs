//! Numeric helpers shared by indicators, risk sizing and backtesting.

pub mod math;
