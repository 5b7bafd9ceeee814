//! Admin API: listings, dashboard stats, manual member/event creation, outbound messages and
//! attendance marking. Responses are camelCase projections of stored rows; dates are `dd.mm.YYYY`
//! and times `HH:MM`.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use storage::{
    ClubStats, EventWithCount, MemberStatus, MemberSummary, MessageSender, MessageView, NewEvent,
    NewMember, NewMessage, RegistrationStatus,
};
use tracing::{info, instrument, warn};

pub const DEFAULT_MESSAGES_LIMIT: i64 = 100;
pub const MAX_MESSAGES_LIMIT: i64 = 500;

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberJson {
    pub id: i64,
    pub name: String,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub joined: String,
    pub events: i64,
    pub format: Vec<String>,
    pub status: MemberStatus,
}

impl From<MemberSummary> for MemberJson {
    fn from(member: MemberSummary) -> Self {
        Self {
            id: member.id,
            name: member.name,
            telegram_id: member.telegram_id,
            username: member.username,
            joined: member.joined_date.format(DATE_FORMAT).to_string(),
            events: member.events_count,
            format: member.formats,
            status: member.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventJson {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub time: String,
    pub end_time: Option<String>,
    pub location: String,
    pub capacity: i64,
    pub registered: i64,
    pub format: String,
    /// `full` when registrations reached capacity, else `upcoming`.
    pub status: &'static str,
    pub description: String,
    pub host_name: Option<String>,
    pub price: Option<i64>,
}

impl From<EventWithCount> for EventJson {
    fn from(item: EventWithCount) -> Self {
        let status = if item.is_full() { "full" } else { "upcoming" };
        let event = item.event;
        Self {
            id: event.id,
            title: event.title,
            date: event.event_date.format(DATE_FORMAT).to_string(),
            time: event.start_time.format(TIME_FORMAT).to_string(),
            end_time: event.end_time.map(|t| t.format(TIME_FORMAT).to_string()),
            location: event.location,
            capacity: event.capacity,
            registered: item.registered,
            format: event.format,
            status,
            description: event.description.unwrap_or_default(),
            host_name: event.host_name,
            price: event.price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageJson {
    pub id: i64,
    pub telegram_id: i64,
    pub text: String,
    pub sender: MessageSender,
    pub admin_name: Option<String>,
    pub member_name: Option<String>,
    pub username: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageView> for MessageJson {
    fn from(view: MessageView) -> Self {
        Self {
            id: view.id,
            telegram_id: view.chat_id,
            text: view.text,
            sender: view.sender,
            admin_name: view.admin_name,
            member_name: view.member_name,
            username: view.username,
            timestamp: view.created_at,
        }
    }
}

#[instrument(skip(state))]
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Json<Vec<MemberJson>>> {
    let members = state.storage.members.list_summaries().await?;
    Ok(Json(members.into_iter().map(MemberJson::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub formats: Vec<String>,
}

#[instrument(skip(state, payload))]
pub async fn create_member(
    State(state): State<AppState>,
    payload: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MemberJson>)> {
    let Json(request) = payload?;

    let mut formats: Vec<String> = request
        .formats
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    formats.sort();
    formats.dedup();

    let member = state
        .storage
        .members
        .create(&NewMember {
            name: request.name,
            telegram_id: request.telegram_id,
            username: request.username,
            status: request.status.unwrap_or(MemberStatus::New),
            joined_date: today(),
            formats: formats.clone(),
        })
        .await?;

    info!(member_id = member.id, "step: admin created member");
    Ok((
        StatusCode::CREATED,
        Json(MemberJson::from(MemberSummary {
            id: member.id,
            name: member.name,
            telegram_id: member.telegram_id,
            username: member.username,
            joined_date: member.joined_date,
            status: member.status,
            events_count: 0,
            formats,
        })),
    ))
}

#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<EventJson>>> {
    let events = state.storage.events.list_all().await?;
    Ok(Json(events.into_iter().map(EventJson::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub end_time: Option<String>,
    pub location: String,
    pub capacity: i64,
    pub format: String,
    pub host_name: Option<String>,
    pub price: Option<i64>,
}

fn parse_time(raw: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ApiError::bad_request(format!("Invalid time {}, expected HH:MM", raw)))
}

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EventJson>)> {
    let Json(request) = payload?;

    let event_date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d").map_err(|_| {
        ApiError::bad_request(format!("Invalid date {}, expected YYYY-MM-DD", request.date))
    })?;
    let start_time = parse_time(&request.time)?;
    let end_time = request.end_time.as_deref().map(parse_time).transpose()?;

    let event = state
        .storage
        .events
        .create(&NewEvent {
            title: request.title,
            description: request.description,
            event_date,
            start_time,
            end_time,
            location: request.location,
            capacity: request.capacity,
            format: request.format,
            host_name: request.host_name,
            price: request.price,
        })
        .await?;

    info!(event_id = event.id, "step: admin created event");
    Ok((
        StatusCode::CREATED,
        Json(EventJson::from(EventWithCount {
            event,
            registered: 0,
        })),
    ))
}

#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<ClubStats>> {
    Ok(Json(state.storage.stats.club_stats(today()).await?))
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<String>,
}

/// Limit from the query string: default when absent, clamped to `1..=MAX_MESSAGES_LIMIT`.
fn messages_limit(raw: Option<&str>) -> ApiResult<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_MESSAGES_LIMIT);
    };
    let limit: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request(format!("limit must be a number, got {}", raw)))?;
    Ok(limit.clamp(1, MAX_MESSAGES_LIMIT))
}

#[instrument(skip(state, query))]
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<MessagesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MessageJson>>> {
    let Query(query) = query?;
    let limit = messages_limit(query.limit.as_deref())?;
    let messages = state.storage.messages.list_recent(limit).await?;
    Ok(Json(messages.into_iter().map(MessageJson::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub telegram_id: i64,
    pub message: String,
    pub admin_name: Option<String>,
}

/// Delivers an admin message to a chat and logs it as outgoing on success.
#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    let Some(notifier) = state.notifier.as_ref() else {
        return Err(ApiError::bot_not_configured());
    };

    if let Err(e) = notifier.deliver(request.telegram_id, &request.message).await {
        warn!(error = %e, telegram_id = request.telegram_id, "Admin message delivery failed");
        return Err(e.into());
    }

    let record = NewMessage::new(request.telegram_id, MessageSender::Admin, request.message)
        .with_admin_name(request.admin_name.filter(|n| !n.trim().is_empty()));
    state.storage.messages.save(&record).await?;

    info!(telegram_id = request.telegram_id, "step: admin message delivered");
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub event_id: i64,
    pub member_id: i64,
    pub status: RegistrationStatus,
}

#[instrument(skip(state, payload))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    state
        .storage
        .registrations
        .set_status(request.event_id, request.member_id, request.status)
        .await?;
    Ok(Json(json!({ "ok": true })))
}
