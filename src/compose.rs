//! Notification composition.
//!
//! Turns a validated [`ContactSubmission`] into the email the site owner
//! receives. Composition is a pure transform and cannot fail.
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_relay::{Address, Composer};
//!
//! let composer = Composer::new(
//!     Address::new("office@example.com"),
//!     Address::with_name("All Perspectives Website", "site@example.com"),
//! );
//!
//! let payload = composer.compose(&submission);
//! assert_eq!(payload.reply_to().email, submission.email());
//! ```

use askama::Template;
use chrono::{DateTime, Utc};

use crate::address::Address;
use crate::submission::ContactSubmission;

/// Site name used in templates when none is configured.
pub const DEFAULT_SITE_NAME: &str = "All Perspectives";

/// Timestamp format for the "sent at" footer.
const SENT_AT_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// The composed notification, ready for a transport.
///
/// Built once per submission and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    from: Address,
    recipient: Address,
    reply_to: Address,
    subject: String,
    html_body: String,
    text_body: String,
    received_at: DateTime<Utc>,
}

impl NotificationPayload {
    /// Sending account.
    pub fn from(&self) -> &Address {
        &self.from
    }

    /// Configured destination. Never taken from the submission.
    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// The submitter, so replies go straight to them.
    pub fn reply_to(&self) -> &Address {
        &self.reply_to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn html_body(&self) -> &str {
        &self.html_body
    }

    pub fn text_body(&self) -> &str {
        &self.text_body
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

#[derive(Template)]
#[template(path = "notification.html")]
struct NotificationHtml<'a> {
    site_name: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    service: &'a str,
    message_html: String,
    sent_at: &'a str,
}

/// Builds notification payloads.
///
/// Holds the configured recipient and sender so callers cannot redirect
/// where notifications go.
#[derive(Debug, Clone)]
pub struct Composer {
    recipient: Address,
    from: Address,
    site_name: String,
}

impl Composer {
    /// Create a composer delivering to `recipient`, sent as `from`.
    pub fn new(recipient: impl Into<Address>, from: impl Into<Address>) -> Self {
        Self {
            recipient: recipient.into(),
            from: from.into(),
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }

    /// Set the site name shown in the notification.
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// Compose a notification stamped with the current time.
    pub fn compose(&self, submission: &ContactSubmission) -> NotificationPayload {
        self.compose_at(submission, Utc::now())
    }

    /// Compose a notification stamped with `received_at`.
    pub fn compose_at(
        &self,
        submission: &ContactSubmission,
        received_at: DateTime<Utc>,
    ) -> NotificationPayload {
        let label = submission.service().label();
        let sent_at = received_at.format(SENT_AT_FORMAT).to_string();

        let subject = format!("New message from {} - {}", submission.name(), label);
        let text_body = self.render_text(submission, label, &sent_at);

        let template = NotificationHtml {
            site_name: &self.site_name,
            name: submission.name(),
            email: submission.email(),
            phone: submission.phone(),
            service: label,
            message_html: message_to_html(submission.message()),
            sent_at: &sent_at,
        };
        let html_body = template.render().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to render notification template");
            format!("<pre>{}</pre>", escape_html(&text_body))
        });

        NotificationPayload {
            from: self.from.clone(),
            recipient: self.recipient.clone(),
            reply_to: Address::new(submission.email()),
            subject,
            html_body,
            text_body,
            received_at,
        }
    }

    /// Plain-text counterpart with the same fields in the same order.
    fn render_text(&self, submission: &ContactSubmission, label: &str, sent_at: &str) -> String {
        let mut lines = vec![
            format!("New contact message - {}", self.site_name),
            String::new(),
            format!("Name: {}", submission.name()),
            format!("Email: {}", submission.email()),
        ];
        if let Some(phone) = submission.phone() {
            lines.push(format!("Phone: {}", phone));
        }
        lines.push(format!("Service: {}", label));
        lines.push(String::new());
        lines.push("Message:".to_string());
        lines.push(submission.message().to_string());
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(format!("Sent at: {}", sent_at));
        lines.push(format!("Via the {} website", self.site_name));

        lines.join("\n")
    }
}

/// Escape user text, then turn line breaks into `<br>`.
fn message_to_html(message: &str) -> String {
    escape_html(message)
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
