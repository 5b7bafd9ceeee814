//! Telegram connectivity config.
//! Loaded from environment variables BOT_TOKEN, TELEGRAM_API_URL (or TELOXIDE_API_URL) and
//! TELEGRAM_TIMEOUT_SECS.

use crate::notifier::TelegramNotifier;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Telegram access settings. The token is optional: without it the server still serves the admin
/// API and answers the webhook with a configuration error.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub telegram_api_url: Option<String>,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").ok().filter(|t| !t.trim().is_empty());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let timeout_secs = match env::var("TELEGRAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("TELEGRAM_TIMEOUT_SECS must be a number, got {}", raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            bot_token,
            telegram_api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Config with the given token and defaults for the rest.
    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: Some(bot_token.into()),
            telegram_api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builds the notifier, or `None` when no token is configured.
    pub fn notifier(&self) -> Result<Option<TelegramNotifier>> {
        let Some(token) = self.bot_token.as_deref() else {
            return Ok(None);
        };
        let notifier =
            TelegramNotifier::new(token, self.telegram_api_url.as_deref(), self.timeout)?;
        Ok(Some(notifier))
    }
}
