pub mod rsi;

pub use rsi::{rsi, rsi_default, DEFAULT_RSI_PERIOD};
