//! Dashboard statistics computed from members, events and registrations.

use crate::error::StorageError;
use crate::event_repo::EventRepository;
use crate::member_repo::MemberRepository;
use crate::models::ClubStats;
use crate::registration_repo::RegistrationRepository;
use crate::sqlite_pool::SqlitePoolManager;
use chrono::{Datelike, Months, NaiveDate};

#[derive(Clone)]
pub struct StatsRepository {
    pool_manager: SqlitePoolManager,
}

impl StatsRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Aggregates as of `today`: "this month" is today's calendar month, attendance only looks
    /// at events dated before today.
    pub async fn club_stats(&self, today: NaiveDate) -> Result<ClubStats, StorageError> {
        let members = MemberRepository::new(self.pool_manager.clone());
        let events = EventRepository::new(self.pool_manager.clone());
        let registrations = RegistrationRepository::new(self.pool_manager.clone());

        let total_members = members.count().await?;
        let (active_members,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM members WHERE status = 'active'")
                .fetch_one(self.pool_manager.pool())
                .await?;

        let (month_start, next_month) = month_bounds(today)?;
        let events_this_month = events.count_between(month_start, next_month).await?;

        let (total, attended) = registrations.attendance_before(today).await?;

        Ok(ClubStats {
            total_members,
            active_members,
            events_this_month,
            attendance: attendance_percent(total, attended),
        })
    }
}

/// First day of `today`'s month and first day of the following month.
fn month_bounds(today: NaiveDate) -> Result<(NaiveDate, NaiveDate), StorageError> {
    let start = today
        .with_day(1)
        .ok_or_else(|| StorageError::Invalid(format!("no first day for {}", today)))?;
    let next = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| StorageError::Invalid(format!("month after {} out of range", start)))?;
    Ok((start, next))
}

fn attendance_percent(total: i64, attended: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((attended as f64 / total as f64) * 100.0).round() as i64
}
