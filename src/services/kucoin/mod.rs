//! KuCoin public market data (REST).

pub mod client;
pub mod messages;
pub mod provider;

pub use client::{KucoinRestClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use provider::KucoinMarketDataProvider;
