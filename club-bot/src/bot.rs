//! ClubBot: the handler chain plus reply delivery.

use crate::handlers::{CommandHandler, MessageLogHandler};
use club_core::{Message, Notifier, Result};
use handler_chain::HandlerChain;
use std::sync::Arc;
use storage::Storage;
use tracing::{error, info, instrument, warn};

/// Processes inbound messages: runs the chain (logger first, then the command handler) and
/// delivers the reply through the [`Notifier`].
#[derive(Clone)]
pub struct ClubBot {
    chain: HandlerChain,
    notifier: Arc<dyn Notifier>,
}

/// Builds the default chain over `storage`.
pub fn build_handler_chain(storage: &Storage) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(MessageLogHandler::new(storage.messages.clone())))
        .add_handler(Arc::new(CommandHandler::new(storage.clone())))
}

impl ClubBot {
    pub fn new(storage: &Storage, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_chain(build_handler_chain(storage), notifier)
    }

    pub fn with_chain(chain: HandlerChain, notifier: Arc<dyn Notifier>) -> Self {
        Self { chain, notifier }
    }

    /// Handles one message and returns the reply text, if any. A failed delivery is logged and
    /// does not fail the call; the reply has already been logged by then.
    #[instrument(skip(self, message))]
    pub async fn process(&self, message: &Message) -> Result<Option<String>> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_content = %message.content,
            "Received message"
        );

        let response = self.chain.handle(message).await.map_err(|e| {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
            e
        })?;

        let Some(reply) = response.reply_text() else {
            return Ok(None);
        };

        if let Err(e) = self.notifier.deliver(message.chat.id, reply).await {
            warn!(error = %e, chat_id = message.chat.id, "Reply delivery failed");
        }
        Ok(Some(reply.to_string()))
    }
}
