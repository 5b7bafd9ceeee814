//! Outbound delivery abstraction.
//!
//! [`Notifier`] is transport-agnostic; club-telegram implements it on top of teloxide and tests
//! substitute a recording double.

use crate::error::Result;
use async_trait::async_trait;

/// Delivers text to a chat recipient. Implementations do not retry; a failed delivery is an `Err`
/// and the caller decides whether it matters.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `text` to the chat identified by `recipient_id`.
    async fn deliver(&self, recipient_id: i64, text: &str) -> Result<()>;
}
