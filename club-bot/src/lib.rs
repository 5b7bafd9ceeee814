//! # club-bot
//!
//! Bath club bot logic: [`command`] parsing, reply texts, the [`CommandHandler`] dispatcher, the
//! [`MessageLogHandler`] chat log and [`ClubBot`], which runs the chain and delivers replies.
//! Transport-agnostic: messages arrive as `club_core::Message` and replies leave via a `Notifier`.

pub mod command;
pub mod handlers;
pub mod replies;

mod bot;

pub use bot::{build_handler_chain, ClubBot};
pub use command::{parse, Command};
pub use handlers::{CommandHandler, MessageLogHandler};
