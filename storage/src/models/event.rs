//! Event records: schedulable sessions with a capacity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub capacity: i64,
    pub format: String,
    pub host_name: Option<String>,
    pub price: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Event joined with its current (non-cancelled) registration count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EventWithCount {
    #[sqlx(flatten)]
    pub event: Event,
    pub registered: i64,
}

impl EventWithCount {
    pub fn is_full(&self) -> bool {
        self.registered >= self.event.capacity
    }
}

/// Input for creating an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub capacity: i64,
    pub format: String,
    pub host_name: Option<String>,
    pub price: Option<i64>,
}
