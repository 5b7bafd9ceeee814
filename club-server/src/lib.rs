//! # club-server
//!
//! HTTP surface of the bath club bot (axum): the Telegram webhook, the admin API and a health
//! endpoint, plus [`run`] and [`migrate`] used by the `club` binary.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{build_router, migrate, run};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
