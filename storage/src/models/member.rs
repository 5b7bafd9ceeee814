//! Member records: identity mapping from a Telegram user to a club member.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a member. New members become active through the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    New,
    Active,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::New => "new",
            MemberStatus::Active => "active",
        }
    }
}

/// Row of the `members` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub joined_date: NaiveDate,
    pub status: MemberStatus,
}

/// Input for creating a member from the admin surface.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub status: MemberStatus,
    pub joined_date: NaiveDate,
    pub formats: Vec<String>,
}

/// Member listing row for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub id: i64,
    pub name: String,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub joined_date: NaiveDate,
    pub status: MemberStatus,
    pub events_count: i64,
    pub formats: Vec<String>,
}

/// Aggregate profile shown by the `/profile` command.
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub member_id: i64,
    pub name: String,
    pub joined_date: NaiveDate,
    pub status: MemberStatus,
    /// Registrations marked attended plus registrations for events already past.
    pub events_count: i64,
    pub formats: Vec<String>,
}
