//! Router assembly and the serve loop.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::routes::{admin, health, webhook};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::http::{header, Method, StatusCode};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use club_core::{init_tracing, Notifier};
use std::sync::Arc;
use std::time::Duration;
use storage::Storage;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const CORS_MAX_AGE: Duration = Duration::from_secs(86400);

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn unknown_resource() -> ApiError {
    ApiError::not_found("Unknown resource")
}

/// Adds the JSON 405 fallback to a resource's method router. OPTIONS never reaches it: the CORS
/// layer answers every OPTIONS request as a preflight.
fn resource(methods: MethodRouter<AppState>) -> MethodRouter<AppState> {
    methods.fallback(method_not_allowed)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/webhook", resource(post(webhook::webhook)))
        .route(
            "/api/members",
            resource(get(admin::list_members).post(admin::create_member)),
        )
        .route(
            "/api/events",
            resource(get(admin::list_events).post(admin::create_event)),
        )
        .route("/api/stats", resource(get(admin::stats)))
        .route("/api/messages", resource(get(admin::list_messages)))
        .route("/api/send-message", resource(post(admin::send_message)))
        .route("/api/attendance", resource(post(admin::mark_attendance)))
        .fallback(unknown_resource)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Creates the schema and exits.
pub async fn migrate(database_url: &str) -> Result<()> {
    Storage::connect(database_url)
        .await
        .with_context(|| format!("Failed to initialize database {}", database_url))?;
    info!(database_url = %database_url, "Schema ready");
    Ok(())
}

/// Main entry: init logging, open storage, build the notifier, then serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<()> {
    init_tracing(Some(config.log_file.as_str()))?;

    info!(
        database_url = %config.database_url,
        bind_addr = %config.bind_addr,
        "Initializing club server"
    );

    let storage = Storage::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to initialize storage {}", config.database_url))?;

    let notifier: Option<Arc<dyn Notifier>> = match config.telegram.notifier()? {
        Some(notifier) => Some(Arc::new(notifier)),
        None => {
            warn!("BOT_TOKEN not set; webhook and send-message will answer 500");
            None
        }
    };

    let router = build_router(AppState::new(storage, notifier));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
