//! # club-telegram
//!
//! Telegram transport layer: webhook [`Update`] types, adapters to `club_core` types, the
//! teloxide-backed [`TelegramNotifier`] and [`TelegramConfig`]. No persistence or bot logic.

mod adapters;
mod config;
mod notifier;
mod update;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use config::{TelegramConfig, DEFAULT_TIMEOUT_SECS};
pub use notifier::TelegramNotifier;
pub use update::{TelegramChat, TelegramMessage, TelegramUser, Update};
