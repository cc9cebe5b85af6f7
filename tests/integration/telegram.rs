//! Telegram notifier against a mocked Bot API

use std::time::Duration;

use lucky_signals::error::SignalError;
use lucky_signals::services::notifier::{Notifier, TelegramNotifier};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_for(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::with_client(server.uri(), "test-token", "42", reqwest::Client::new())
        .with_part_delay(Duration::ZERO)
        .with_max_retries(0)
}

#[tokio::test]
async fn sends_markdown_message_to_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .and(body_partial_json(json!({
            "chat_id": "42",
            "text": "hello *world*",
            "parse_mode": "Markdown"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(notifier_for(&server).send("hello *world*").await);
}

#[tokio::test]
async fn long_message_is_sent_in_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(3)
        .mount(&server)
        .await;

    let text = (0..300)
        .map(|i| format!("line {:0>24}", i))
        .collect::<Vec<_>>()
        .join("\n");
    assert_ok!(notifier_for(&server).send(&text).await);

    let received = server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 3);
    for request in received {
        let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json body");
        let part = body["text"].as_str().expect("text field");
        assert!(part.chars().count() <= 4000);
    }
}

#[tokio::test]
async fn rejected_message_is_notification_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = assert_err!(notifier_for(&server).send("hi").await);
    match err {
        SignalError::Notification(msg) => assert!(msg.contains("chat not found")),
        other => panic!("expected Notification error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_message_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&server)
        .await;

    assert_ok!(notifier_for(&server).send("   ").await);
}
