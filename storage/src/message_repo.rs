//! Message repository: the append-only chat log.
//!
//! Uses SqlitePoolManager and the message models. Callers append with `save` and read with
//! `list_recent` (admin inbox) or `list_by_chat`.

use crate::error::StorageError;
use crate::models::{MessageRecord, MessageView, NewMessage};
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn save(&self, message: &NewMessage) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO messages (chat_id, direction, sender, admin_name, text, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(message.chat_id)
        .bind(message.sender.direction())
        .bind(message.sender)
        .bind(&message.admin_name)
        .bind(&message.text)
        .bind(message.created_at)
        .fetch_one(pool)
        .await?;

        info!(
            message_id = id,
            chat_id = message.chat_id,
            sender = ?message.sender,
            "Saved message"
        );
        Ok(id)
    }

    /// Newest `limit` messages across all chats, joined with the member owning each chat.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<MessageView>, StorageError> {
        let messages = sqlx::query_as::<_, MessageView>(
            r#"
            SELECT msg.id, msg.chat_id, msg.text, msg.sender, msg.admin_name, msg.created_at,
                   m.name AS member_name, m.username
              FROM messages msg
              LEFT JOIN members m ON m.telegram_id = msg.chat_id
             ORDER BY msg.created_at DESC, msg.id DESC
             LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!("Retrieved {} messages", messages.len());
        Ok(messages)
    }

    /// Newest `limit` messages of one chat.
    pub async fn list_by_chat(
        &self,
        chat_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, chat_id, direction, sender, admin_name, text, created_at
              FROM messages
             WHERE chat_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!(
            "Retrieved {} recent messages for chat {}",
            messages.len(),
            chat_id
        );
        Ok(messages)
    }
}
