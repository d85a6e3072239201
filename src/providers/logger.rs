//! Logger transport that only logs notifications.
//!
//! Useful for staging environments or when you want to see what would be sent
//! without actually sending or storing anything.

use async_trait::async_trait;

use crate::compose::NotificationPayload;
use crate::error::TransportError;
use crate::transport::{DeliveryReceipt, Transport};

/// Logger transport that emits tracing events for notifications.
pub struct LoggerTransport {
    /// If true, log full payload details. If false, just a summary.
    log_full: bool,
}

impl LoggerTransport {
    /// Create a logger transport with brief output.
    pub fn new() -> Self {
        Self { log_full: false }
    }

    /// Create a logger transport that also logs both bodies.
    pub fn full() -> Self {
        Self { log_full: true }
    }

    /// Set whether to log full payload details.
    pub fn log_full(mut self, full: bool) -> Self {
        self.log_full = full;
        self
    }
}

impl Default for LoggerTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LoggerTransport {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, TransportError> {
        let message_id = uuid::Uuid::new_v4().to_string();

        if self.log_full {
            tracing::info!(
                message_id = %message_id,
                from = %payload.from().formatted_rfc5322(),
                to = %payload.recipient().formatted(),
                reply_to = %payload.reply_to().email,
                subject = %payload.subject(),
                "Notification logged (full)"
            );
            tracing::debug!(body = %payload.text_body(), "Text body");
            tracing::debug!(body = %payload.html_body(), "HTML body");
        } else {
            tracing::info!(
                message_id = %message_id,
                to = %payload.recipient().email,
                subject = %payload.subject(),
                "Notification logged"
            );
        }

        Ok(DeliveryReceipt::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}
