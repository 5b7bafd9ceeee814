//! Shared helpers for club-bot integration tests: temp-dir storage, message builder and
//! notifier doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveTime, Utc};
use club_core::{Chat, ClubError, Message, Notifier, Result, User};
use std::sync::Mutex;
use storage::{Event, NewEvent, Storage};
use tempfile::TempDir;

pub async fn test_storage() -> (TempDir, Storage) {
    let dir = TempDir::new().expect("TempDir::new must succeed");
    let url = format!("sqlite://{}", dir.path().join("club.db").display());
    let storage = Storage::connect(&url)
        .await
        .expect("Failed to open storage");
    (dir, storage)
}

/// Builds a private-chat text message from `user_id` (chat id equals user id).
pub fn message(user_id: i64, first_name: &str, text: &str) -> Message {
    Message {
        id: format!("msg-{}", user_id),
        user: User {
            id: user_id,
            username: Some(format!("user{}", user_id)),
            first_name: Some(first_name.to_string()),
            last_name: None,
        },
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        content: text.to_string(),
        created_at: Utc::now(),
    }
}

pub async fn create_event(storage: &Storage, title: &str, days: i64, capacity: i64) -> Event {
    storage
        .events
        .create(&NewEvent {
            title: title.to_string(),
            description: None,
            event_date: Local::now().date_naive() + Duration::days(days),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).expect("valid time"),
            end_time: None,
            location: "Баня на Лесной".to_string(),
            capacity,
            format: "mixed".to_string(),
            host_name: None,
            price: Some(2500),
        })
        .await
        .expect("Failed to create event")
}

/// Records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, recipient_id: i64, text: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("lock")
            .push((recipient_id, text.to_string()));
        Ok(())
    }
}

/// Fails every delivery.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(&self, _recipient_id: i64, _text: &str) -> Result<()> {
        Err(ClubError::Delivery("provider unreachable".to_string()))
    }
}
