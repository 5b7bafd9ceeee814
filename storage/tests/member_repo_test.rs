//! Integration tests for [`storage::MemberRepository`].
//!
//! Covers identity resolution (including concurrent duplicates), admin creation, profile
//! aggregation and the admin listing.

mod common;

use common::{create_event, create_member, test_storage, today};
use storage::{ChatIdentity, MemberStatus, NewMember, RegistrationStatus, StorageError};

/// **Test: resolving the same telegram id twice creates exactly one member.**
///
/// **Setup:** Empty DB.
/// **Action:** `resolve` for id 42 ("Anna") twice.
/// **Expected:** First call creates (status `new`, joined today), second returns the same row with `created == false`.
#[tokio::test]
async fn test_resolve_creates_once() {
    let (_dir, storage) = test_storage().await;
    let identity = ChatIdentity {
        telegram_id: 42,
        display_name: "Anna",
        username: Some("anna_p"),
    };

    let (first, created) = storage.members.resolve(&identity, today()).await.unwrap();
    assert!(created);
    assert_eq!(first.status, MemberStatus::New);
    assert_eq!(first.joined_date, today());
    assert_eq!(first.username.as_deref(), Some("anna_p"));

    let (second, created_again) = storage.members.resolve(&identity, today()).await.unwrap();
    assert!(!created_again);
    assert_eq!(second.id, first.id);
    assert_eq!(storage.members.count().await.unwrap(), 1);
}

/// **Test: concurrent `/start` for one id still yields a single row.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_resolve_concurrent_duplicates() {
    let (_dir, storage) = test_storage().await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let storage = storage.clone();
        tasks.push(tokio::spawn(async move {
            let identity = ChatIdentity {
                telegram_id: 42,
                display_name: "Anna",
                username: None,
            };
            storage.members.resolve(&identity, today()).await
        }));
    }

    let mut created_count = 0;
    let mut ids = Vec::new();
    for task in tasks {
        let (member, created) = task.await.unwrap().expect("resolve must succeed");
        if created {
            created_count += 1;
        }
        ids.push(member.id);
    }

    assert_eq!(created_count, 1);
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(storage.members.count().await.unwrap(), 1);
}

/// **Test: admin creation rejects a duplicate telegram id.**
#[tokio::test]
async fn test_create_duplicate_telegram_id() {
    let (_dir, storage) = test_storage().await;
    create_member(&storage, 42, "Anna").await;

    let duplicate = NewMember {
        name: "Another Anna".to_string(),
        telegram_id: Some(42),
        username: None,
        status: MemberStatus::Active,
        joined_date: today(),
        formats: vec![],
    };

    let err = storage.members.create(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

/// **Test: walk-in members without a telegram id can be created side by side.**
#[tokio::test]
async fn test_create_members_without_telegram_id() {
    let (_dir, storage) = test_storage().await;
    for name in ["Олег", "Мария"] {
        storage
            .members
            .create(&NewMember {
                name: name.to_string(),
                telegram_id: None,
                username: None,
                status: MemberStatus::Active,
                joined_date: today(),
                formats: vec!["hot".to_string()],
            })
            .await
            .unwrap();
    }
    assert_eq!(storage.members.count().await.unwrap(), 2);
}

/// **Test: profile counts attended and past registrations and lists preferences.**
///
/// **Setup:** Member with preferences; one past registration, one attended future registration, one plain future registration.
/// **Expected:** events_count = 2; formats sorted.
#[tokio::test]
async fn test_profile_aggregates() {
    let (_dir, storage) = test_storage().await;
    let member = storage
        .members
        .create(&NewMember {
            name: "Anna".to_string(),
            telegram_id: Some(42),
            username: None,
            status: MemberStatus::New,
            joined_date: today(),
            formats: vec!["women".to_string(), "hot".to_string()],
        })
        .await
        .unwrap();

    let past = create_event(&storage, "Прошедшее парение", -7, 10).await;
    let upcoming = create_event(&storage, "Будущее парение", 7, 10).await;
    let later = create_event(&storage, "Ещё одно", 14, 10).await;
    let now = chrono::Utc::now();
    for event in [&past, &upcoming, &later] {
        storage
            .registrations
            .register(event.id, member.id, now)
            .await
            .unwrap();
    }
    storage
        .registrations
        .set_status(upcoming.id, member.id, RegistrationStatus::Attended)
        .await
        .unwrap();

    let profile = storage.members.profile(42, today()).await.unwrap().unwrap();
    assert_eq!(profile.name, "Anna");
    assert_eq!(profile.events_count, 2);
    assert_eq!(profile.formats, vec!["hot".to_string(), "women".to_string()]);
}

#[tokio::test]
async fn test_profile_unknown_member() {
    let (_dir, storage) = test_storage().await;
    assert!(storage.members.profile(999, today()).await.unwrap().is_none());
}

/// **Test: admin listing is newest first and counts non-cancelled registrations.**
#[tokio::test]
async fn test_list_summaries() {
    let (_dir, storage) = test_storage().await;
    let older = storage
        .members
        .create(&NewMember {
            name: "Old Timer".to_string(),
            telegram_id: None,
            username: None,
            status: MemberStatus::Active,
            joined_date: today() - chrono::Duration::days(30),
            formats: vec!["mixed".to_string()],
        })
        .await
        .unwrap();
    let newer = create_member(&storage, 42, "Anna").await;

    let first = create_event(&storage, "Парение 1", 3, 5).await;
    let second = create_event(&storage, "Парение 2", 4, 5).await;
    let now = chrono::Utc::now();
    storage.registrations.register(first.id, newer.id, now).await.unwrap();
    storage.registrations.register(second.id, newer.id, now).await.unwrap();
    storage
        .registrations
        .set_status(second.id, newer.id, RegistrationStatus::Cancelled)
        .await
        .unwrap();

    let summaries = storage.members.list_summaries().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, newer.id);
    assert_eq!(summaries[0].events_count, 1);
    assert_eq!(summaries[1].id, older.id);
    assert_eq!(summaries[1].formats, vec!["mixed".to_string()]);
}
