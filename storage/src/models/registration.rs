//! Registration records: the join between members and events.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Attended,
    Cancelled,
}

/// Result of a registration attempt. Only `Registered` inserts a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    AlreadyRegistered,
    Full,
    EventNotFound,
}

/// One of a member's registrations, as listed by `/myevents`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberEvent {
    pub event_id: i64,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: String,
    pub status: RegistrationStatus,
}
