//! Alert delivery to a messaging webhook.

pub mod format;
pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;

pub use format::{format_batch_summary, format_signal_alert, split_message, MAX_MESSAGE_LEN};
pub use telegram::TelegramNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a markdown text body, splitting it when needed.
    async fn send(&self, text: &str) -> Result<()>;
}
