//! Telegram Bot API `sendMessage` notifier

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::format::{split_message, MAX_MESSAGE_LEN};
use super::Notifier;
use crate::error::{Result, SignalError};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: String,
    http: reqwest::Client,
    part_delay: Duration,
    max_retries: usize,
}

impl TelegramNotifier {
    pub fn with_client(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            http,
            part_delay: Duration::from_secs(1),
            max_retries: 2,
        }
    }

    /// Pause between the parts of a split message.
    pub fn with_part_delay(mut self, delay: Duration) -> Self {
        self.part_delay = delay;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    async fn send_once(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SignalError::Network(format!("Telegram send failed: {}", e.without_url())))?;

        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();
        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse { description, .. }) => Err(SignalError::Notification(format!(
                "Telegram responded {}: {}",
                status,
                description.unwrap_or_default()
            ))),
            None => Err(SignalError::Notification(format!(
                "Telegram responded {} with an unreadable body",
                status
            ))),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let total = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.part_delay.is_zero() {
                tokio::time::sleep(self.part_delay).await;
            }

            (|| self.send_once(chunk))
                .retry(
                    ExponentialBuilder::default()
                        .with_min_delay(Duration::from_millis(200))
                        .with_max_times(self.max_retries),
                )
                .when(|e| matches!(e, SignalError::Network(_)))
                .notify(|e, wait| {
                    warn!(error = %e, retry_in_ms = wait.as_millis() as u64, "Telegram send failed, retrying");
                })
                .await?;

            debug!(part = i + 1, parts = total, "Telegram message part sent");
        }

        info!(parts = total, "Telegram message sent");
        Ok(())
    }
}
