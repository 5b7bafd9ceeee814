//! Chat log records. The log is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a logged message. Members write inbound text; the bot and admins write outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Member,
    Bot,
    Admin,
}

impl MessageSender {
    /// Value stored in `messages.direction`.
    pub fn direction(&self) -> &'static str {
        match self {
            MessageSender::Member => "incoming",
            MessageSender::Bot | MessageSender::Admin => "outgoing",
        }
    }
}

/// Row of the `messages` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub chat_id: i64,
    pub direction: String,
    pub sender: MessageSender,
    pub admin_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: i64,
    pub sender: MessageSender,
    pub admin_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Creates a message stamped with the current time.
    pub fn new(chat_id: i64, sender: MessageSender, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender,
            admin_name: None,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_admin_name(mut self, admin_name: Option<String>) -> Self {
        self.admin_name = admin_name;
        self
    }
}

/// Logged message joined with the member owning the chat, for the admin inbox.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageView {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub sender: MessageSender,
    pub admin_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub member_name: Option<String>,
    pub username: Option<String>,
}
