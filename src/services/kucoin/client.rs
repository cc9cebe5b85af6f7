//! Thin REST client for KuCoin public endpoints

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::messages::{ApiResponse, Level1Ticker};
use crate::error::{Result, SignalError};
use crate::models::candle::Timeframe;

pub const DEFAULT_API_BASE: &str = "https://api.kucoin.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct KucoinRestClient {
    base_url: String,
    http: reqwest::Client,
}

impl KucoinRestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("lucky-signals")
            .build()
            .map_err(|e| SignalError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use a preconfigured client (tests point this at a mock server).
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| SignalError::Config(format!("invalid KuCoin base URL: {}", e)))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ApiResponse<T>> {
        debug!(url = %url, "KuCoin request");
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignalError::DataUnavailable(format!(
                "KuCoin responded {} for {}",
                status,
                url.path()
            )));
        }

        Ok(response.json::<ApiResponse<T>>().await?)
    }

    /// Level-1 order book ticker for an already normalized symbol.
    pub async fn fetch_ticker(&self, symbol: &str) -> Result<ApiResponse<Level1Ticker>> {
        let url = self.endpoint("/api/v1/market/orderbook/level1", &[("symbol", symbol)])?;
        self.get(url).await
    }

    /// Raw candle rows, newest first, as the exchange returns them.
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<ApiResponse<Vec<Value>>> {
        let url = self.endpoint(
            "/api/v1/market/candles",
            &[("type", timeframe.as_str()), ("symbol", symbol)],
        )?;
        self.get(url).await
    }
}
