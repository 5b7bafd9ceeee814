//! Member repository: identity resolution, profile and admin listings.
//!
//! External: SQLite via sqlx; every query is parameterized.

use crate::error::StorageError;
use crate::models::{split_formats, Member, MemberProfile, MemberStatus, MemberSummary, NewMember};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::NaiveDate;
use tracing::info;

const MEMBER_COLUMNS: &str = "id, name, telegram_id, username, joined_date, status";

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    telegram_id: Option<i64>,
    username: Option<String>,
    joined_date: NaiveDate,
    status: MemberStatus,
    events_count: i64,
    formats: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    joined_date: NaiveDate,
    status: MemberStatus,
    events_count: i64,
    formats: Option<String>,
}

/// Profile fields carried by the chat user resolving to a member.
#[derive(Debug, Clone)]
pub struct ChatIdentity<'a> {
    pub telegram_id: i64,
    pub display_name: &'a str,
    pub username: Option<&'a str>,
}

#[derive(Clone)]
pub struct MemberRepository {
    pool_manager: SqlitePoolManager,
}

impl MemberRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Member>, StorageError> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE telegram_id = ?");
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(telegram_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(member)
    }

    /// Returns the member for `identity`, creating it with status `new` and `today` as join date
    /// when absent. The boolean is true when this call created the row.
    ///
    /// The insert is `ON CONFLICT DO NOTHING` on the unique telegram id inside a write-locking
    /// transaction, so duplicate concurrent `/start`s end with exactly one row and every caller
    /// reads that row back.
    pub async fn resolve(
        &self,
        identity: &ChatIdentity<'_>,
        today: NaiveDate,
    ) -> Result<(Member, bool), StorageError> {
        let pool_manager = self.pool_manager.clone();
        let telegram_id = identity.telegram_id;
        let display_name = identity.display_name.to_string();
        let username = identity.username.map(str::to_string);

        let (member, created) = tokio::spawn(async move {
            let mut conn = pool_manager.begin_immediate().await?;

            let result = async {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO members (name, telegram_id, username, joined_date, status)
                    VALUES (?, ?, ?, ?, 'new')
                    ON CONFLICT (telegram_id) DO NOTHING
                    "#,
                )
                .bind(&display_name)
                .bind(telegram_id)
                .bind(&username)
                .bind(today)
                .execute(&mut *conn)
                .await?
                .rows_affected();

                let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE telegram_id = ?");
                let member = sqlx::query_as::<_, Member>(&sql)
                    .bind(telegram_id)
                    .fetch_one(&mut *conn)
                    .await?;

                Ok::<_, sqlx::Error>((member, inserted == 1))
            }
            .await;

            SqlitePoolManager::finish(conn, result.is_ok()).await?;
            result
        })
        .await
        .map_err(|e| StorageError::Database(format!("member resolution task failed: {}", e)))??;

        if created {
            info!(
                member_id = member.id,
                telegram_id = identity.telegram_id,
                "Created member"
            );
        }
        Ok((member, created))
    }

    /// Inserts a member from the admin surface together with its format preferences.
    /// A duplicate telegram id yields [`StorageError::AlreadyExists`].
    pub async fn create(&self, new_member: &NewMember) -> Result<Member, StorageError> {
        if new_member.name.trim().is_empty() {
            return Err(StorageError::Invalid("member name must not be empty".to_string()));
        }

        let mut tx = self.pool_manager.pool().begin().await?;

        let sql = format!(
            "INSERT INTO members (name, telegram_id, username, joined_date, status) \
             VALUES (?, ?, ?, ?, ?) RETURNING {MEMBER_COLUMNS}"
        );
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(new_member.name.trim())
            .bind(new_member.telegram_id)
            .bind(&new_member.username)
            .bind(new_member.joined_date)
            .bind(new_member.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        for format in &new_member.formats {
            sqlx::query(
                "INSERT INTO member_preferences (member_id, format) VALUES (?, ?) ON CONFLICT DO NOTHING",
            )
            .bind(member.id)
            .bind(format)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(member_id = member.id, "Created member from admin surface");
        Ok(member)
    }

    /// Profile for the member bound to `telegram_id`, or `None` if it never ran `/start`.
    pub async fn profile(
        &self,
        telegram_id: i64,
        today: NaiveDate,
    ) -> Result<Option<MemberProfile>, StorageError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                m.id,
                m.name,
                m.joined_date,
                m.status,
                (SELECT COUNT(*)
                   FROM event_registrations r
                   JOIN events e ON e.id = r.event_id
                  WHERE r.member_id = m.id
                    AND (r.status = 'attended'
                         OR (r.status = 'registered' AND e.event_date < ?))) AS events_count,
                (SELECT GROUP_CONCAT(DISTINCT p.format)
                   FROM member_preferences p
                  WHERE p.member_id = m.id) AS formats
            FROM members m
            WHERE m.telegram_id = ?
            "#,
        )
        .bind(today)
        .bind(telegram_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(row.map(|row| MemberProfile {
            member_id: row.id,
            name: row.name,
            joined_date: row.joined_date,
            status: row.status,
            events_count: row.events_count,
            formats: split_formats(row.formats),
        }))
    }

    /// All members with their non-cancelled registration count, newest first.
    pub async fn list_summaries(&self) -> Result<Vec<MemberSummary>, StorageError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                m.id,
                m.name,
                m.telegram_id,
                m.username,
                m.joined_date,
                m.status,
                (SELECT COUNT(DISTINCT r.event_id)
                   FROM event_registrations r
                  WHERE r.member_id = m.id AND r.status <> 'cancelled') AS events_count,
                (SELECT GROUP_CONCAT(DISTINCT p.format)
                   FROM member_preferences p
                  WHERE p.member_id = m.id) AS formats
            FROM members m
            ORDER BY m.joined_date DESC, m.id DESC
            "#,
        )
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!("Retrieved {} members", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| MemberSummary {
                id: row.id,
                name: row.name,
                telegram_id: row.telegram_id,
                username: row.username,
                joined_date: row.joined_date,
                status: row.status,
                events_count: row.events_count,
                formats: split_formats(row.formats),
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(total)
    }
}
