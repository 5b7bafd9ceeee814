//! Event repository: creation and listings annotated with registration counts.

use crate::error::StorageError;
use crate::models::{Event, EventWithCount, NewEvent};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::{NaiveDate, Utc};
use tracing::info;

const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.event_date, e.start_time, e.end_time, \
     e.location, e.capacity, e.format, e.host_name, e.price, e.created_at";

// RETURNING may only name columns of the modified table, unqualified.
const RETURNING_COLUMNS: &str = "id, title, description, event_date, start_time, end_time, \
     location, capacity, format, host_name, price, created_at";

#[derive(Clone)]
pub struct EventRepository {
    pool_manager: SqlitePoolManager,
}

impl EventRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn create(&self, new_event: &NewEvent) -> Result<Event, StorageError> {
        if new_event.capacity < 0 {
            return Err(StorageError::Invalid(format!(
                "capacity must not be negative, got {}",
                new_event.capacity
            )));
        }
        if new_event.title.trim().is_empty() {
            return Err(StorageError::Invalid("event title must not be empty".to_string()));
        }

        let sql = format!(
            "INSERT INTO events (title, description, event_date, start_time, end_time, location, \
             capacity, format, host_name, price, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {RETURNING_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(new_event.title.trim())
            .bind(&new_event.description)
            .bind(new_event.event_date)
            .bind(new_event.start_time)
            .bind(new_event.end_time)
            .bind(&new_event.location)
            .bind(new_event.capacity)
            .bind(&new_event.format)
            .bind(&new_event.host_name)
            .bind(new_event.price)
            .bind(Utc::now())
            .fetch_one(self.pool_manager.pool())
            .await?;

        info!(event_id = event.id, title = %event.title, "Created event");
        Ok(event)
    }

    pub async fn find_by_id(&self, event_id: i64) -> Result<Option<Event>, StorageError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(event)
    }

    /// Up to `limit` events dated `today` or later, ordered by (date, start time).
    pub async fn list_upcoming(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<EventWithCount>, StorageError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}, COUNT(r.id) AS registered \
             FROM events e \
             LEFT JOIN event_registrations r ON r.event_id = e.id AND r.status <> 'cancelled' \
             WHERE e.event_date >= ? \
             GROUP BY e.id \
             ORDER BY e.event_date, e.start_time, e.id \
             LIMIT ?"
        );
        let events = sqlx::query_as::<_, EventWithCount>(&sql)
            .bind(today)
            .bind(limit)
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(events)
    }

    /// Every event with its registration count, ordered by (date, start time).
    pub async fn list_all(&self) -> Result<Vec<EventWithCount>, StorageError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}, COUNT(r.id) AS registered \
             FROM events e \
             LEFT JOIN event_registrations r ON r.event_id = e.id AND r.status <> 'cancelled' \
             GROUP BY e.id \
             ORDER BY e.event_date, e.start_time, e.id"
        );
        let events = sqlx::query_as::<_, EventWithCount>(&sql)
            .fetch_all(self.pool_manager.pool())
            .await?;
        info!("Retrieved {} events", events.len());
        Ok(events)
    }

    /// Number of events dated within `[from, until)`.
    pub async fn count_between(&self, from: NaiveDate, until: NaiveDate) -> Result<i64, StorageError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM events WHERE event_date >= ? AND event_date < ?")
                .bind(from)
                .bind(until)
                .fetch_one(self.pool_manager.pool())
                .await?;
        Ok(count)
    }
}
