//! Local transport for development and testing.
//!
//! Captures notifications in memory instead of sending them, so tests can
//! assert on what the pipeline produced.
//!
//! # Testing Usage
//!
//! ```rust,ignore
//! use contact_relay::providers::LocalTransport;
//! use contact_relay::testing::*;
//!
//! #[tokio::test]
//! async fn notifies_office() {
//!     let transport = LocalTransport::new();
//!     let pipeline = pipeline_with(transport.clone());
//!
//!     pipeline.submit(&raw).await;
//!
//!     assert_notification_sent(&transport);
//!     assert_notification_subject_contains(&transport, "Aerial Technical Inspections");
//! }
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::compose::NotificationPayload;
use crate::error::TransportError;
use crate::storage::{MemoryStorage, StoredNotification};
use crate::transport::{DeliveryReceipt, Transport};

/// Transport that stores notifications in memory.
///
/// Clones share storage, so a test can keep one handle while the pipeline
/// owns another.
pub struct LocalTransport {
    storage: Arc<MemoryStorage>,
    /// If set, deliver() returns this error (for testing error paths).
    fail_with: Arc<RwLock<Option<TransportError>>>,
}

impl LocalTransport {
    /// Create a new local transport with fresh storage.
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::shared())
    }

    /// Create a local transport with existing storage.
    pub fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        Self {
            storage,
            fail_with: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a reference to the underlying storage.
    pub fn storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.storage)
    }

    // =========================================================================
    // Failure Simulation (for testing)
    // =========================================================================

    /// Make every delivery fail with `error` until cleared.
    ///
    /// ```rust,ignore
    /// let transport = LocalTransport::new();
    /// transport.set_failure(TransportError::authentication("535 bad credentials"));
    /// ```
    pub fn set_failure(&self, error: TransportError) {
        *self.fail_with.write() = Some(error);
    }

    /// Clear the failure state.
    pub fn clear_failure(&self) {
        *self.fail_with.write() = None;
    }

    // =========================================================================
    // Notification Access (for testing assertions)
    // =========================================================================

    /// All captured notifications, newest first.
    pub fn notifications(&self) -> Vec<StoredNotification> {
        self.storage.all()
    }

    pub fn last_notification(&self) -> Option<StoredNotification> {
        self.storage.all().into_iter().next()
    }

    pub fn notification_count(&self) -> usize {
        self.storage.count()
    }

    pub fn has_notifications(&self) -> bool {
        self.storage.count() > 0
    }

    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Remove and return all captured notifications.
    pub fn flush(&self) -> Vec<StoredNotification> {
        self.storage.flush()
    }

    /// Check if a notification was sent to a specific address.
    pub fn sent_to(&self, email: &str) -> bool {
        self.storage
            .all()
            .iter()
            .any(|stored| stored.payload.recipient().email.eq_ignore_ascii_case(email))
    }

    /// Find notifications matching a predicate.
    pub fn find<F>(&self, predicate: F) -> Vec<StoredNotification>
    where
        F: Fn(&NotificationPayload) -> bool,
    {
        self.storage
            .all()
            .into_iter()
            .filter(|stored| predicate(&stored.payload))
            .collect()
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LocalTransport {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            fail_with: Arc::clone(&self.fail_with),
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, TransportError> {
        if let Some(error) = self.fail_with.read().clone() {
            return Err(error);
        }

        let message_id = self.storage.push(payload.clone());
        Ok(DeliveryReceipt::new(message_id))
    }

    async fn verify(&self) -> Result<(), TransportError> {
        match self.fail_with.read().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
