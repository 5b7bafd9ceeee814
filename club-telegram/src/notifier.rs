//! Wraps teloxide::Bot and implements [`club_core::Notifier`]. Production code sends messages via
//! the Telegram Bot API; tests point it at a mock server or substitute another Notifier.

use async_trait::async_trait;
use club_core::{ClubError, Notifier, Result};
use std::time::Duration;
use teloxide::{prelude::*, types::ChatId};
use tracing::{info, instrument};

/// Thin wrapper around teloxide::Bot with a bounded request timeout and no retries.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: teloxide::Bot,
}

impl TelegramNotifier {
    /// Builds a notifier for `token`. `api_url` overrides the Bot API base URL (local Bot API
    /// server or a test double); an unparsable URL is a config error.
    pub fn new(token: &str, api_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClubError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let bot = teloxide::Bot::with_client(token, client);

        let bot = match api_url {
            Some(url_str) => {
                let url = reqwest::Url::parse(url_str).map_err(|e| {
                    ClubError::Config(format!("Invalid TELEGRAM_API_URL {}: {}", url_str, e))
                })?;
                bot.set_api_url(url)
            }
            None => bot,
        };

        Ok(Self { bot })
    }

    /// Creates a notifier from an existing teloxide Bot.
    pub fn from_bot(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip(self, text))]
    async fn deliver(&self, recipient_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(recipient_id), text.to_string())
            .await
            .map_err(|e| ClubError::Delivery(e.to_string()))?;
        info!(recipient_id, text_len = text.len(), "Message delivered");
        Ok(())
    }
}
