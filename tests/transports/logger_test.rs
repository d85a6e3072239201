//! Logger transport tests.

use contact_relay::providers::LoggerTransport;
use contact_relay::{validate, Composer, Dispatcher, RawSubmission, Transport};

fn payload() -> contact_relay::NotificationPayload {
    let submission = validate(&RawSubmission {
        name: Some("Ana Silva".into()),
        email: Some("ana@example.com".into()),
        phone: Some("912345678".into()),
        service: Some("exterior-surveys".into()),
        message: Some("Survey of the garden and facade".into()),
    })
    .unwrap();
    Composer::new("office@example.com", "site@example.com").compose(&submission)
}

#[tokio::test]
async fn deliver_returns_ok() {
    let receipt = LoggerTransport::new().deliver(&payload()).await.unwrap();
    assert!(!receipt.message_id.is_empty());
}

#[tokio::test]
async fn deliver_with_full_logging_returns_ok() {
    let receipt = LoggerTransport::full().deliver(&payload()).await.unwrap();
    assert!(!receipt.message_id.is_empty());
}

#[tokio::test]
async fn each_delivery_gets_a_fresh_id() {
    let transport = LoggerTransport::new();
    let first = transport.deliver(&payload()).await.unwrap();
    let second = transport.deliver(&payload()).await.unwrap();
    assert_ne!(first.message_id, second.message_id);
}

#[tokio::test]
async fn dispatcher_over_logger_succeeds() {
    let dispatcher = Dispatcher::new(LoggerTransport::new());

    assert!(dispatcher.verify().await.is_ok());
    assert!(dispatcher.send(&payload()).await.is_success());
}
