//! Transport trait and delivery receipt.
//!
//! # Why `async_trait`?
//!
//! The dispatcher holds its transport as `Arc<dyn Transport>` so the provider
//! can be chosen from configuration at startup. Native async trait methods
//! are not object-safe, so `#[async_trait]` boxes the futures instead. One
//! allocation per delivery is nothing next to an SMTP round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::compose::NotificationPayload;
use crate::error::TransportError;

/// Result of a successful hand-off to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Opaque message ID returned by the transport.
    pub message_id: String,
}

impl DeliveryReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}

/// A mail transport the dispatcher can hand payloads to.
///
/// Implementations make exactly one attempt per call. Retries are the
/// caller's business.
///
/// # Example
///
/// ```ignore
/// use contact_relay::providers::LoggerTransport;
/// use contact_relay::Transport;
///
/// let transport = LoggerTransport::new();
/// let receipt = transport.deliver(&payload).await?;
/// println!("Sent with ID: {}", receipt.message_id);
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a single notification.
    async fn deliver(&self, payload: &NotificationPayload)
        -> Result<DeliveryReceipt, TransportError>;

    /// Check that the transport can reach its server.
    ///
    /// Default: nothing to check.
    async fn verify(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Get the provider name (for logging/metrics).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }
}
