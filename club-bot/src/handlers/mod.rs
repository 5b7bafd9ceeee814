//! Handlers run by the club bot chain.

pub mod command_handler;
pub mod message_log_handler;

pub use command_handler::CommandHandler;
pub use message_log_handler::MessageLogHandler;
