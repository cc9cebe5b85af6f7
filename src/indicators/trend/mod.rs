pub mod ema;

pub use ema::{ema, ema_series, EmaTrend};
