//! Assertion helpers for tests that run the pipeline against a
//! [`LocalTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_relay::providers::LocalTransport;
//! use contact_relay::testing::*;
//!
//! #[tokio::test]
//! async fn office_is_notified() {
//!     let transport = LocalTransport::new();
//!
//!     // ... submit a contact request ...
//!
//!     assert_notification_sent(&transport);
//!     assert_notification_to(&transport, "office@example.com");
//!     assert_notification_subject_contains(&transport, "Security Verification");
//!     assert_notification_html_matches(&transport, r"mailto:[^\"]+@");
//! }
//! ```

use regex::Regex;

use crate::compose::NotificationPayload;
use crate::providers::LocalTransport;
use crate::storage::StoredNotification;

// ============================================================================
// Helper Functions
// ============================================================================

/// Format captured notifications for failure messages.
fn summary(notifications: &[StoredNotification]) -> String {
    if notifications.is_empty() {
        return "  (no notifications sent)".to_string();
    }

    notifications
        .iter()
        .enumerate()
        .map(|(i, stored)| {
            let payload = &stored.payload;
            format!(
                "  {}. To: {}, Reply-To: {}, Subject: \"{}\"",
                i + 1,
                payload.recipient().email,
                payload.reply_to().email,
                payload.subject()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid regex pattern '{}': {}", pattern, e))
}

// ============================================================================
// Basic Assertions
// ============================================================================

/// Assert that at least one notification was sent.
///
/// # Panics
///
/// Panics if none were sent.
pub fn assert_notification_sent(transport: &LocalTransport) {
    assert!(
        transport.has_notifications(),
        "Expected at least one notification to be sent, but none were sent"
    );
}

/// Assert that no notification was sent.
///
/// # Panics
///
/// Panics if any notification was sent.
pub fn assert_no_notifications_sent(transport: &LocalTransport) {
    let notifications = transport.notifications();
    assert!(
        notifications.is_empty(),
        "Expected no notifications to be sent, but {} were sent.\n\nNotifications sent:\n{}",
        notifications.len(),
        summary(&notifications)
    );
}

/// Assert that exactly `expected` notifications were sent.
pub fn assert_notification_count(transport: &LocalTransport, expected: usize) {
    let actual = transport.notification_count();
    assert!(
        actual == expected,
        "Expected {} notification(s) to be sent, but {} were sent.\n\nNotifications sent:\n{}",
        expected,
        actual,
        summary(&transport.notifications())
    );
}

/// Assert that a notification went to `email`.
pub fn assert_notification_to(transport: &LocalTransport, email: &str) {
    assert!(
        transport.sent_to(email),
        "Expected a notification to be sent to '{}'.\n\nNotifications sent:\n{}",
        email,
        summary(&transport.notifications())
    );
}

/// Assert that a notification lists `email` as its Reply-To.
pub fn assert_notification_reply_to(transport: &LocalTransport, email: &str) {
    assert_notification_matches(transport, |payload| {
        payload.reply_to().email.eq_ignore_ascii_case(email)
    });
}

/// Assert that a notification with exactly `subject` was sent.
pub fn assert_notification_subject(transport: &LocalTransport, subject: &str) {
    let notifications = transport.notifications();
    assert!(
        notifications
            .iter()
            .any(|stored| stored.payload.subject() == subject),
        "Expected a notification with subject '{}'.\n\nNotifications sent:\n{}",
        subject,
        summary(&notifications)
    );
}

/// Assert that a notification with a subject containing `text` was sent.
pub fn assert_notification_subject_contains(transport: &LocalTransport, text: &str) {
    let notifications = transport.notifications();
    assert!(
        notifications
            .iter()
            .any(|stored| stored.payload.subject().contains(text)),
        "Expected a notification with subject containing '{}'.\n\nNotifications sent:\n{}",
        text,
        summary(&notifications)
    );
}

/// Assert that a notification matching `predicate` was sent.
///
/// ```rust,ignore
/// assert_notification_matches(&transport, |payload| {
///     payload.text_body().contains("Phone: 912345678")
/// });
/// ```
pub fn assert_notification_matches<F>(transport: &LocalTransport, predicate: F)
where
    F: Fn(&NotificationPayload) -> bool,
{
    let notifications = transport.notifications();
    assert!(
        notifications.iter().any(|stored| predicate(&stored.payload)),
        "Expected a notification matching the predicate.\n\nNotifications sent:\n{}",
        summary(&notifications)
    );
}

// ============================================================================
// Body Assertions
// ============================================================================

/// Assert that some HTML body contains `text`.
pub fn assert_notification_html_contains(transport: &LocalTransport, text: &str) {
    assert_notification_matches(transport, |payload| payload.html_body().contains(text));
}

/// Assert that some plain text body contains `text`.
pub fn assert_notification_text_contains(transport: &LocalTransport, text: &str) {
    assert_notification_matches(transport, |payload| payload.text_body().contains(text));
}

// ============================================================================
// Regex Assertions
// ============================================================================

/// Assert that some subject matches `pattern`.
///
/// # Panics
///
/// Panics if the pattern is invalid or nothing matches.
pub fn assert_notification_subject_matches(transport: &LocalTransport, pattern: &str) {
    let regex = compile(pattern);
    let notifications = transport.notifications();
    assert!(
        notifications
            .iter()
            .any(|stored| regex.is_match(stored.payload.subject())),
        "Expected a notification with subject matching '{}'.\n\nNotifications sent:\n{}",
        pattern,
        summary(&notifications)
    );
}

/// Assert that some HTML body matches `pattern`.
pub fn assert_notification_html_matches(transport: &LocalTransport, pattern: &str) {
    let regex = compile(pattern);
    let notifications = transport.notifications();
    assert!(
        notifications
            .iter()
            .any(|stored| regex.is_match(stored.payload.html_body())),
        "Expected a notification with HTML body matching '{}'.\n\nNotifications sent:\n{}",
        pattern,
        summary(&notifications)
    );
}

/// Assert that some plain text body matches `pattern`.
pub fn assert_notification_text_matches(transport: &LocalTransport, pattern: &str) {
    let regex = compile(pattern);
    let notifications = transport.notifications();
    assert!(
        notifications
            .iter()
            .any(|stored| regex.is_match(stored.payload.text_body())),
        "Expected a notification with text body matching '{}'.\n\nNotifications sent:\n{}",
        pattern,
        summary(&notifications)
    );
}

// ============================================================================
// Access
// ============================================================================

/// The most recent notification.
///
/// # Panics
///
/// Panics if none was sent.
pub fn last_notification(transport: &LocalTransport) -> StoredNotification {
    transport
        .last_notification()
        .unwrap_or_else(|| panic!("Expected a notification to be sent, but none were sent"))
}

/// Remove and return all captured notifications.
pub fn flush_notifications(transport: &LocalTransport) -> Vec<StoredNotification> {
    transport.flush()
}
