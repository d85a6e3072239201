//! # contact-relay
//!
//! Contact form intake for the All Perspectives website: validate what the
//! form posts, compose a notification for the site owner, and deliver it
//! through a mail transport.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! SMTP_HOST=smtp.example.com
//! SMTP_PORT=465
//! SMTP_USER=site@example.com
//! SMTP_PASSWORD=secret
//! DESTINATION_EMAIL=office@example.com
//! ```
//!
//! Run submissions through the pipeline:
//! ```rust,ignore
//! use contact_relay::{ContactPipeline, RawSubmission};
//!
//! let pipeline = ContactPipeline::from_env();
//! let response = pipeline.submit(&raw).await;
//! ```
//!
//! Or use the pieces directly:
//! ```rust,ignore
//! use contact_relay::{validate, Composer, Dispatcher};
//! use contact_relay::providers::LocalTransport;
//!
//! let submission = validate(&raw)?;
//! let payload = Composer::new("office@example.com", "site@example.com").compose(&submission);
//! let outcome = Dispatcher::new(LocalTransport::new()).send(&payload).await;
//! ```
//!
//! See [`config`] for every environment variable.
//!
//! ## Feature Flags
//!
//! - `smtp` - SMTP transport via lettre
//! - `local` - LocalTransport and [`testing`] assertions
//! - `axum` - `POST /api/contact` router
//! - `server` - the `contact-relay` binary
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//!
//! ## Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `contact_submissions_total` | Counter | outcome | Submissions by terminal stage |
//! | `contact_dispatch_duration_seconds` | Histogram | provider | Delivery duration |
//!
//! Install a recorder (e.g., `metrics-exporter-prometheus`) in your app to collect them.

/// The version of the contact-relay crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod compose;
pub mod config;
mod dispatch;
mod error;
mod pipeline;
mod service;
mod submission;
mod transport;

pub mod providers;

#[cfg(feature = "local")]
mod storage;

#[cfg(feature = "local")]
pub mod testing;

#[cfg(feature = "axum")]
pub mod routes;

// Re-exports
pub use address::{Address, InvalidAddress};
pub use compose::{Composer, NotificationPayload, DEFAULT_SITE_NAME};
pub use config::Settings;
pub use dispatch::{DeliveryOutcome, Dispatcher};
pub use error::{ConfigError, FailureCategory, TransportError, ValidationError};
pub use pipeline::{ContactPipeline, ContactResponse, Stage};
pub use service::{resolve_label, ServiceCode};
pub use submission::{validate, ContactSubmission, RawSubmission};
pub use transport::{DeliveryReceipt, Transport};

#[cfg(feature = "local")]
pub use storage::{MemoryStorage, StoredNotification};

/// Common imports.
pub mod prelude {
    pub use crate::{
        validate, Address, Composer, ContactPipeline, ContactResponse, DeliveryOutcome,
        Dispatcher, FailureCategory, RawSubmission, Settings, Transport, TransportError,
        ValidationError,
    };
}
