//! Handler that appends the conversation to the chat log: the member's text in before(), the
//! bot's reply in after().

use async_trait::async_trait;
use club_core::{ClubError, Handler, HandlerResponse, Message, Result};
use storage::{MessageRepository, MessageSender, NewMessage};
use tracing::{error, info, instrument};

/// Saves the inbound text before any command runs, so it is logged even when a later handler
/// fails. Must be the first handler of the chain so its after() runs last and sees the reply.
#[derive(Clone)]
pub struct MessageLogHandler {
    repo: MessageRepository,
}

impl MessageLogHandler {
    pub fn new(repo: MessageRepository) -> Self {
        Self { repo }
    }

    async fn save(&self, message: NewMessage) -> Result<()> {
        let chat_id = message.chat_id;
        self.repo.save(&message).await.map_err(|e| {
            error!(error = %e, chat_id, "Failed to save message");
            ClubError::Database(e.to_string())
        })?;
        Ok(())
    }
}

#[async_trait]
impl Handler for MessageLogHandler {
    fn name(&self) -> &'static str {
        "message_log"
    }

    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.content.is_empty() {
            return Ok(true);
        }

        let mut inbound = NewMessage::new(message.chat.id, MessageSender::Member, &message.content);
        inbound.created_at = message.created_at;
        self.save(inbound).await?;

        info!(chat_id = message.chat.id, "step: MessageLogHandler before done, inbound saved");
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let Some(reply) = response.reply_text() else {
            return Ok(());
        };

        self.save(NewMessage::new(message.chat.id, MessageSender::Bot, reply))
            .await?;

        info!(chat_id = message.chat.id, "step: MessageLogHandler after done, reply saved");
        Ok(())
    }
}
