//! Inbound Telegram webhook.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use club_core::ToCoreMessage;
use club_telegram::{TelegramMessageWrapper, Update};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

/// Parses the update and runs it through the bot. Internal failures after a successful parse are
/// logged and still acknowledged so Telegram does not redeliver the update.
#[instrument(skip(state, body))]
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let Some(bot) = state.bot.as_ref() else {
        return Err(ApiError::bot_not_configured());
    };

    let update = Update::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed update: {}", e)))?;

    let Some(message) = update.user_message() else {
        info!(update_id = update.update_id, "step: webhook update without user message, ignored");
        return Ok(Json(json!({ "ok": true })));
    };

    let core_message = TelegramMessageWrapper(message).to_core();
    if let Err(e) = bot.process(&core_message).await {
        error!(
            error = %e,
            update_id = update.update_id,
            chat_id = core_message.chat.id,
            "Failed to process update"
        );
    }

    Ok(Json(json!({ "ok": true })))
}
