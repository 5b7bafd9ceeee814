//! SQLite connection pool wrapper for the storage crate.

use log::{info, warn};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

/// Manages a single SQLite pool; creates the DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (`sqlite://path.db`, a bare path, or `sqlite::memory:`).
    /// Foreign keys are enforced and writers wait up to five seconds for the database lock.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquires a connection and opens a write-locking transaction on it. Concurrent writers
    /// (other connections or other processes) queue on the database lock instead of interleaving
    /// their reads and writes. Close it with [`SqlitePoolManager::finish`]; callers run the pair
    /// on a spawned task so a dropped request cannot return the connection mid-transaction.
    pub(crate) async fn begin_immediate(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(conn)
    }

    /// Commits when `ok`, rolls back otherwise. If the statement itself fails the connection is
    /// closed rather than returned to the pool with the transaction still open.
    pub(crate) async fn finish(mut conn: PoolConnection<Sqlite>, ok: bool) -> Result<(), sqlx::Error> {
        let statement = if ok { "COMMIT" } else { "ROLLBACK" };
        if let Err(e) = sqlx::query(statement).execute(&mut *conn).await {
            warn!("{} failed, closing connection: {}", statement, e);
            if let Err(close_err) = conn.close().await {
                warn!("Failed to close connection: {}", close_err);
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_commit_closes_connection() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("pool.db").display());
        let manager = SqlitePoolManager::new(&url).await.unwrap();

        let conn = manager.pool().acquire().await.unwrap();
        assert_eq!(manager.pool().size(), 1);

        // No transaction is open, so COMMIT fails.
        let result = SqlitePoolManager::finish(conn, true).await;

        assert!(result.is_err());
        assert_eq!(manager.pool().size(), 0);
    }

    #[tokio::test]
    async fn test_finish_commits_immediate_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("pool.db").display());
        let manager = SqlitePoolManager::new(&url).await.unwrap();
        sqlx::query("CREATE TABLE t (v INTEGER)")
            .execute(manager.pool())
            .await
            .unwrap();

        let mut conn = manager.begin_immediate().await.unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (1)")
            .execute(&mut *conn)
            .await
            .unwrap();
        SqlitePoolManager::finish(conn, true).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM t")
            .fetch_one(manager.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
