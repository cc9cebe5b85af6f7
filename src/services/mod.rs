//! Outbound integrations: exchange market data and alert delivery.

pub mod kucoin;
pub mod market_data;
pub mod notifier;

pub use kucoin::{KucoinMarketDataProvider, KucoinRestClient};
pub use market_data::{normalize_symbol, MarketDataProvider};
pub use notifier::{Notifier, TelegramNotifier};
