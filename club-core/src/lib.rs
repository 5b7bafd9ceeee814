//! # club-core
//!
//! Core types and traits shared by the club bot crates: [`Handler`], [`Notifier`], message and user
//! types, errors, and tracing initialization. Transport-agnostic; used by handler-chain, club-bot,
//! club-telegram and club-server.

pub mod error;
pub mod logger;
pub mod notifier;
pub mod types;

pub use error::{ClubError, Result};
pub use logger::init_tracing;
pub use notifier::Notifier;
pub use types::{
    Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User,
};
