//! Integration tests for [`club_telegram::TelegramNotifier`] against a mock Bot API server.

use club_core::{ClubError, Notifier};
use club_telegram::TelegramNotifier;
use std::time::Duration;

/// Teloxide request path format is `/bot<token>/<method>`.
const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

fn notifier_for(server: &mockito::ServerGuard) -> TelegramNotifier {
    TelegramNotifier::new(TEST_BOT_TOKEN, Some(&server.url()), Duration::from_secs(5))
        .expect("notifier must build")
}

/// **Test: deliver posts sendMessage with the chat id and text.**
///
/// **Setup:** Mock server answering `/bot<token>/sendMessage` with a sent message.
/// **Action:** `deliver(42, "Привет")`.
/// **Expected:** Ok; the mock was hit exactly once.
#[tokio::test]
async fn test_deliver_sends_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("/bot{}/sendMessage", TEST_BOT_TOKEN).as_str())
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("42".to_string()),
            mockito::Matcher::Regex("Привет".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "ok": true,
            "result": {
                "message_id": 1,
                "date": 1706529600,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 123456789, "is_bot": true, "first_name": "ClubBot", "username": "club_bot"},
                "text": "Привет"
            }
        }"#,
        )
        .expect(1)
        .create_async()
        .await;

    notifier_for(&server).deliver(42, "Привет").await.unwrap();

    mock.assert_async().await;
}

/// **Test: an API error surfaces as a delivery error.**
#[tokio::test]
async fn test_deliver_maps_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", format!("/bot{}/sendMessage", TEST_BOT_TOKEN).as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = notifier_for(&server).deliver(7, "hello").await.unwrap_err();

    assert!(matches!(err, ClubError::Delivery(_)));
}

#[test]
fn test_invalid_api_url_is_config_error() {
    let result = TelegramNotifier::new(TEST_BOT_TOKEN, Some("::nope"), Duration::from_secs(1));
    assert!(matches!(result, Err(ClubError::Config(_))));
}
