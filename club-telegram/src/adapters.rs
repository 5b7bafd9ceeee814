//! Adapters from webhook update types to club_core types.

use crate::update::{TelegramMessage, TelegramUser};
use chrono::{DateTime, Utc};
use club_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a Telegram user for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a TelegramUser);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id,
            username: self.0.username.clone().filter(|s| !s.is_empty()),
            first_name: self.0.first_name.clone(),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a Telegram message for conversion to core [`Message`]. A message without a sender maps
/// to the chat id; callers filter those out with `Update::user_message` first.
pub struct TelegramMessageWrapper<'a>(pub &'a TelegramMessage);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let message = self.0;
        Message {
            id: message.message_id.to_string(),
            user: message
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: message.chat.id,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: message.chat.id,
                chat_type: message.chat.chat_type.clone().unwrap_or_default(),
            },
            content: message.text.clone().unwrap_or_default(),
            created_at: message
                .date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
                .unwrap_or_else(Utc::now),
        }
    }
}
