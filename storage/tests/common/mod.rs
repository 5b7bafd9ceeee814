//! Shared helpers for storage integration tests: on-disk SQLite in a temp dir and fixtures.

#![allow(dead_code)]

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use storage::{ChatIdentity, Event, Member, NewEvent, Storage};
use tempfile::TempDir;

/// Opens a fresh database file; keep the `TempDir` alive for the duration of the test.
pub async fn test_storage() -> (TempDir, Storage) {
    let dir = TempDir::new().expect("TempDir::new must succeed");
    let url = format!("sqlite://{}", dir.path().join("club.db").display());
    let storage = Storage::connect(&url)
        .await
        .expect("Failed to open storage");
    (dir, storage)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub fn new_event(title: &str, date: NaiveDate, start: NaiveTime, capacity: i64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: Some("Парение с вениками".to_string()),
        event_date: date,
        start_time: start,
        end_time: None,
        location: "Баня на Лесной".to_string(),
        capacity,
        format: "mixed".to_string(),
        host_name: Some("Иван".to_string()),
        price: Some(2500),
    }
}

pub async fn create_event(storage: &Storage, title: &str, days: i64, capacity: i64) -> Event {
    storage
        .events
        .create(&new_event(title, days_from_today(days), at(19, 0), capacity))
        .await
        .expect("Failed to create event")
}

pub async fn create_member(storage: &Storage, telegram_id: i64, name: &str) -> Member {
    let identity = ChatIdentity {
        telegram_id,
        display_name: name,
        username: None,
    };
    let (member, _) = storage
        .members
        .resolve(&identity, today())
        .await
        .expect("Failed to resolve member");
    member
}
