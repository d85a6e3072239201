//! Local transport tests.

use contact_relay::providers::LocalTransport;
use contact_relay::{
    validate, Composer, Dispatcher, FailureCategory, MemoryStorage, NotificationPayload,
    RawSubmission, Transport, TransportError,
};

fn payload_from(name: &str, service: &str) -> NotificationPayload {
    let submission = validate(&RawSubmission {
        name: Some(name.into()),
        email: Some("jo@x.com".into()),
        service: Some(service.into()),
        message: Some("Please call me back".into()),
        ..Default::default()
    })
    .unwrap();
    Composer::new("office@example.com", "site@example.com").compose(&submission)
}

// ============================================================================
// Storage Tests
// ============================================================================

#[tokio::test]
async fn captures_sent_notifications() {
    let transport = LocalTransport::new();

    transport
        .deliver(&payload_from("Jo", "inspections"))
        .await
        .unwrap();

    assert!(transport.has_notifications());
    assert_eq!(transport.notification_count(), 1);
    assert!(transport.sent_to("office@example.com"));
}

#[tokio::test]
async fn newest_notification_comes_first() {
    let transport = LocalTransport::new();

    transport.deliver(&payload_from("Jo", "inspections")).await.unwrap();
    transport.deliver(&payload_from("Ana", "security")).await.unwrap();

    let notifications = transport.notifications();
    assert_eq!(notifications.len(), 2);
    assert!(notifications[0].payload.subject().contains("Ana"));
    assert!(transport
        .last_notification()
        .unwrap()
        .payload
        .subject()
        .contains("Ana"));
}

#[tokio::test]
async fn can_flush_notifications() {
    let transport = LocalTransport::new();

    transport.deliver(&payload_from("Jo", "other")).await.unwrap();
    transport.deliver(&payload_from("Ana", "other")).await.unwrap();

    let flushed = transport.flush();
    assert_eq!(flushed.len(), 2);
    assert!(!transport.has_notifications());
}

#[tokio::test]
async fn find_filters_by_payload() {
    let transport = LocalTransport::new();

    transport.deliver(&payload_from("Jo", "solar-panels")).await.unwrap();
    transport.deliver(&payload_from("Ana", "security")).await.unwrap();

    let solar = transport.find(|payload| payload.subject().contains("Solar Panel"));
    assert_eq!(solar.len(), 1);
}

#[tokio::test]
async fn shared_storage_sees_deliveries() {
    let storage = MemoryStorage::shared();
    let transport = LocalTransport::with_storage(storage.clone());

    let receipt = transport.deliver(&payload_from("Jo", "other")).await.unwrap();

    assert_eq!(storage.count(), 1);
    assert!(storage.get(&receipt.message_id).is_some());
}

// ============================================================================
// Failure Simulation
// ============================================================================

#[tokio::test]
async fn simulated_failures_reach_the_dispatcher() {
    let transport = LocalTransport::new();
    let dispatcher = Dispatcher::new(transport.clone());

    for (error, category) in [
        (
            TransportError::authentication("535 bad credentials"),
            FailureCategory::Authentication,
        ),
        (
            TransportError::connection("connection refused"),
            FailureCategory::Connection,
        ),
        (
            TransportError::malformed("553 mailbox name not allowed"),
            FailureCategory::MalformedMessage,
        ),
        (TransportError::unknown("boom"), FailureCategory::Unknown),
    ] {
        transport.set_failure(error);
        let outcome = dispatcher.send(&payload_from("Jo", "other")).await;
        assert_eq!(outcome.category(), Some(category));
        assert!(dispatcher.verify().await.is_err());
    }

    transport.clear_failure();
    assert!(dispatcher.send(&payload_from("Jo", "other")).await.is_success());
    assert_eq!(transport.notification_count(), 1);
}
