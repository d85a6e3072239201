//! In-memory capture of delivered notifications for the local transport.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::compose::NotificationPayload;

/// A captured notification with metadata.
#[derive(Debug, Clone)]
pub struct StoredNotification {
    /// Identifier handed back as the message ID.
    pub id: String,
    pub payload: NotificationPayload,
    /// When the notification was captured.
    pub sent_at: DateTime<Utc>,
}

/// Thread-safe in-memory storage, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    notifications: RwLock<Vec<StoredNotification>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage wrapped in an Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store a notification and return its ID.
    pub fn push(&self, payload: NotificationPayload) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.notifications.write().push(StoredNotification {
            id: id.clone(),
            payload,
            sent_at: Utc::now(),
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<StoredNotification> {
        self.notifications
            .read()
            .iter()
            .find(|stored| stored.id == id)
            .cloned()
    }

    /// Get all stored notifications, newest first.
    pub fn all(&self) -> Vec<StoredNotification> {
        self.notifications.read().iter().rev().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.notifications.read().len()
    }

    pub fn clear(&self) {
        self.notifications.write().clear();
    }

    /// Remove and return all stored notifications, newest first.
    pub fn flush(&self) -> Vec<StoredNotification> {
        let mut drained = std::mem::take(&mut *self.notifications.write());
        drained.reverse();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Composer;
    use crate::submission::submission;

    fn payload(name: &str) -> NotificationPayload {
        Composer::new("office@example.com", "site@example.com").compose(&submission(
            name,
            "someone@example.com",
            None,
            "other",
            "Please get in touch",
        ))
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();

        let id = storage.push(payload("First"));
        assert_eq!(storage.count(), 1);
        assert!(storage.get(&id).unwrap().payload.subject().contains("First"));

        let id2 = storage.push(payload("Second"));
        let all = storage.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, id2);

        storage.clear();
        assert_eq!(storage.count(), 0);
        assert!(storage.get(&id).is_none());
    }

    #[test]
    fn test_flush() {
        let storage = MemoryStorage::new();
        storage.push(payload("First"));
        storage.push(payload("Second"));
        storage.push(payload("Third"));

        let flushed = storage.flush();
        assert_eq!(flushed.len(), 3);
        assert!(flushed[0].payload.subject().contains("Third"));
        assert!(flushed[2].payload.subject().contains("First"));

        assert_eq!(storage.count(), 0);
        assert!(storage.flush().is_empty());
    }
}
