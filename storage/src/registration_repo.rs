//! Registration repository: capacity-checked registration and per-member listings.
//!
//! The existence check, capacity check and insert are one conditional `INSERT ... SELECT`
//! executed inside a `BEGIN IMMEDIATE` transaction. The write lock is taken before anything is
//! read, so two requests for the last seat are serialized by SQLite and the second one observes
//! the first one's row. The `UNIQUE (event_id, member_id)` constraint backs the pair invariant.

use crate::error::StorageError;
use crate::models::{MemberEvent, RegistrationOutcome, RegistrationStatus};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqliteConnection;
use tracing::{info, instrument};

enum StatusUpdate {
    Updated,
    Missing,
    Full,
}

#[derive(Clone)]
pub struct RegistrationRepository {
    pool_manager: SqlitePoolManager,
}

impl RegistrationRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Registers `member_id` for `event_id` unless already registered or the event is full.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        event_id: i64,
        member_id: i64,
        registered_at: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, StorageError> {
        let pool_manager = self.pool_manager.clone();
        let outcome = tokio::spawn(async move {
            let mut conn = pool_manager.begin_immediate().await?;
            let result = Self::register_locked(&mut conn, event_id, member_id, registered_at).await;
            SqlitePoolManager::finish(conn, result.is_ok()).await?;
            result
        })
        .await
        .map_err(|e| StorageError::Database(format!("registration task failed: {}", e)))??;

        info!(event_id, member_id, outcome = ?outcome, "Registration attempt finished");
        Ok(outcome)
    }

    async fn register_locked(
        conn: &mut SqliteConnection,
        event_id: i64,
        member_id: i64,
        registered_at: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO event_registrations (event_id, member_id, registered_at, status)
            SELECT e.id, ?, ?, 'registered'
              FROM events e
             WHERE e.id = ?
               AND NOT EXISTS (
                   SELECT 1 FROM event_registrations r
                    WHERE r.event_id = e.id AND r.member_id = ?)
               AND (SELECT COUNT(*) FROM event_registrations r
                     WHERE r.event_id = e.id AND r.status <> 'cancelled') < e.capacity
            "#,
        )
        .bind(member_id)
        .bind(registered_at)
        .bind(event_id)
        .bind(member_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(RegistrationOutcome::Registered);
        }

        // Nothing inserted: find out which guard rejected it. Still under the write lock.
        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM event_registrations WHERE event_id = ? AND member_id = ?",
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await?;
        if existing.is_some() {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let event: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(match event {
            Some(_) => RegistrationOutcome::Full,
            None => RegistrationOutcome::EventNotFound,
        })
    }

    /// Non-cancelled registrations for an event.
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = ? AND status <> 'cancelled'",
        )
        .bind(event_id)
        .fetch_one(self.pool_manager.pool())
        .await?;
        Ok(count)
    }

    /// The member's registrations for events dated `today` or later, soonest first.
    pub async fn list_upcoming_for_member(
        &self,
        member_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<MemberEvent>, StorageError> {
        let events = sqlx::query_as::<_, MemberEvent>(
            r#"
            SELECT e.id AS event_id, e.title, e.event_date, e.start_time, e.location, r.status
              FROM event_registrations r
              JOIN events e ON e.id = r.event_id
             WHERE r.member_id = ? AND e.event_date >= ?
             ORDER BY e.event_date, e.start_time, e.id
            "#,
        )
        .bind(member_id)
        .bind(today)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(events)
    }

    /// `(total, attended)` over non-cancelled registrations for events dated before `today`.
    pub async fn attendance_before(&self, today: NaiveDate) -> Result<(i64, i64), StorageError> {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN r.status = 'attended' THEN 1 ELSE 0 END), 0)
              FROM event_registrations r
              JOIN events e ON e.id = r.event_id
             WHERE e.event_date < ? AND r.status <> 'cancelled'
            "#,
        )
        .bind(today)
        .fetch_one(self.pool_manager.pool())
        .await?;
        Ok(row)
    }

    /// Sets a registration's status. Used to record attendance after an event.
    ///
    /// Moving a cancelled registration back to `registered` or `attended` retakes a seat, so the
    /// update only applies while the event still has room; otherwise
    /// [`StorageError::CapacityExceeded`] is returned and the row is left cancelled.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        event_id: i64,
        member_id: i64,
        status: RegistrationStatus,
    ) -> Result<(), StorageError> {
        let pool_manager = self.pool_manager.clone();
        let outcome = tokio::spawn(async move {
            let mut conn = pool_manager.begin_immediate().await?;
            let result = Self::set_status_locked(&mut conn, event_id, member_id, status).await;
            SqlitePoolManager::finish(conn, result.is_ok()).await?;
            result
        })
        .await
        .map_err(|e| StorageError::Database(format!("status update task failed: {}", e)))??;

        match outcome {
            StatusUpdate::Updated => {
                info!(event_id, member_id, status = ?status, "Registration status updated");
                Ok(())
            }
            StatusUpdate::Missing => Err(StorageError::NotFound(format!(
                "registration for event {} and member {}",
                event_id, member_id
            ))),
            StatusUpdate::Full => Err(StorageError::CapacityExceeded(format!(
                "event {} has no free seat for member {}",
                event_id, member_id
            ))),
        }
    }

    async fn set_status_locked(
        conn: &mut SqliteConnection,
        event_id: i64,
        member_id: i64,
        status: RegistrationStatus,
    ) -> Result<StatusUpdate, sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE event_registrations
               SET status = ?
             WHERE event_id = ? AND member_id = ?
               AND (status <> 'cancelled'
                    OR ? = 'cancelled'
                    OR (SELECT COUNT(*) FROM event_registrations r
                         WHERE r.event_id = ? AND r.status <> 'cancelled')
                       < (SELECT e.capacity FROM events e WHERE e.id = ?))
            "#,
        )
        .bind(status)
        .bind(event_id)
        .bind(member_id)
        .bind(status)
        .bind(event_id)
        .bind(event_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if updated == 1 {
            return Ok(StatusUpdate::Updated);
        }

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM event_registrations WHERE event_id = ? AND member_id = ?",
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(match existing {
            Some(_) => StatusUpdate::Full,
            None => StatusUpdate::Missing,
        })
    }
}
