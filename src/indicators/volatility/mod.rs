pub mod atr;

pub use atr::{atr, atr_default, DEFAULT_ATR_PERIOD};
