//! Canonical schema for the club database.
//!
//! Registrations carry a status enum (registered / attended / cancelled) rather than a boolean
//! attendance flag, and format preferences live in their own table keyed by member.

use sqlx::SqlitePool;
use tracing::info;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        telegram_id INTEGER UNIQUE,
        username TEXT,
        joined_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'active'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS member_preferences (
        member_id INTEGER NOT NULL REFERENCES members(id),
        format TEXT NOT NULL,
        PRIMARY KEY (member_id, format)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        event_date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT,
        location TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity >= 0),
        format TEXT NOT NULL,
        host_name TEXT,
        price INTEGER,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS event_registrations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id),
        member_id INTEGER NOT NULL REFERENCES members(id),
        registered_at TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'registered'
            CHECK (status IN ('registered', 'attended', 'cancelled')),
        UNIQUE (event_id, member_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id INTEGER NOT NULL,
        direction TEXT NOT NULL CHECK (direction IN ('incoming', 'outgoing')),
        sender TEXT NOT NULL CHECK (sender IN ('member', 'bot', 'admin')),
        admin_name TEXT,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_date ON events(event_date, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_registrations_member ON event_registrations(member_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)",
];

/// Creates tables and indexes if they do not exist. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database tables ready");
    Ok(())
}
