//! Error types for the signal pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    /// Transport failure or timeout talking to an upstream service.
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered but the payload carried no usable data.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient data: {available} usable timeframes, {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SignalError {
    /// Errors that end a single symbol's pipeline run.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Network(_) | Self::DataUnavailable(_))
    }
}

impl From<reqwest::Error> for SignalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SignalError::DataUnavailable(format!("malformed response body: {}", err))
        } else {
            SignalError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
