//! Error types for the bot core.

use thiserror::Error;

/// Top-level error for the bot (store access, outbound delivery, config).
#[derive(Error, Debug)]
pub enum ClubError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for core operations; uses [`ClubError`].
pub type Result<T> = std::result::Result<T, ClubError>;
