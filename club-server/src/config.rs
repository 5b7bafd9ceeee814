//! Server configuration from environment variables, with CLI overrides.
//! DATABASE_URL, LOG_FILE and BIND_ADDR here; Telegram settings come from [`TelegramConfig`].

use anyhow::{Context, Result};
use club_telegram::TelegramConfig;
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://club_bot.db";
pub const DEFAULT_LOG_FILE: &str = "logs/club-bot.log";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub log_file: String,
    pub telegram: TelegramConfig,
}

impl ServerConfig {
    /// Loads config from the environment. Call `dotenvy::dotenv()` first.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Ok(Self {
            bind_addr: parse_addr(&bind_addr)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
            telegram: TelegramConfig::from_env()?,
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        token: Option<String>,
        database_url: Option<String>,
        bind: Option<String>,
    ) -> Result<Self> {
        if let Some(token) = token {
            self.telegram.bot_token = Some(token);
        }
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind) = bind {
            self.bind_addr = parse_addr(&bind)?;
        }
        Ok(self)
    }
}

fn parse_addr(raw: &str) -> Result<SocketAddr> {
    raw.parse()
        .with_context(|| format!("BIND_ADDR must be host:port, got {}", raw))
}
