//! Webhook payload types: the subset of the Telegram Bot API `Update` the club bot reads.
//!
//! Unknown fields are ignored, so edited messages, callback queries and other update kinds
//! deserialize with `message == None`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub chat_type: Option<String>,
}

impl Update {
    /// Parses a webhook body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// The message the bot should process: present and sent by a user (channel posts have no sender).
    pub fn user_message(&self) -> Option<&TelegramMessage> {
        self.message.as_ref().filter(|m| m.from.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_message() {
        let body = br#"{
            "update_id": 10,
            "message": {
                "message_id": 5,
                "date": 1706529600,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 42, "is_bot": false, "first_name": "Anna", "language_code": "ru"},
                "text": "/start"
            }
        }"#;
        let update = Update::from_slice(body).unwrap();
        let message = update.user_message().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.from.as_ref().unwrap().first_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_parse_update_without_message() {
        let body = br#"{"update_id": 11, "edited_message": {"message_id": 1, "chat": {"id": 1}}}"#;
        let update = Update::from_slice(body).unwrap();
        assert!(update.message.is_none());
        assert!(update.user_message().is_none());
    }

    #[test]
    fn test_message_without_sender_is_skipped() {
        let body = br#"{"update_id": 12, "message": {"message_id": 1, "chat": {"id": -100}, "text": "post"}}"#;
        let update = Update::from_slice(body).unwrap();
        assert!(update.message.is_some());
        assert!(update.user_message().is_none());
    }

    #[test]
    fn test_malformed_body() {
        assert!(Update::from_slice(b"{not json").is_err());
        assert!(Update::from_slice(br#"{"message": {}}"#).is_err());
    }
}
