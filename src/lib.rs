//! Lucky Signals: technical-indicator trading signals over public exchange data.
//!
//! Pipeline: market data → indicators → decision → risk levels → accuracy gate.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{Result, SignalError};
