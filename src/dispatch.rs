//! Delivery dispatch.
//!
//! The [`Dispatcher`] hands a composed payload to its transport exactly once
//! and always answers with a [`DeliveryOutcome`]. Transport errors are logged
//! with their raw detail and reduced to a [`FailureCategory`] for the caller.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use std::time::Instant;

use serde::Serialize;
use tracing::Instrument;

use crate::compose::NotificationPayload;
use crate::error::{ConfigError, FailureCategory, TransportError};
use crate::transport::Transport;

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Success {
        message_id: String,
    },
    Failure {
        category: FailureCategory,
        /// Raw transport text. For logs, never for end users.
        #[serde(skip)]
        raw_detail: String,
    },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Success { message_id } => Some(message_id),
            Self::Failure { .. } => None,
        }
    }

    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { category, .. } => Some(*category),
        }
    }
}

impl From<TransportError> for DeliveryOutcome {
    fn from(err: TransportError) -> Self {
        Self::Failure {
            category: err.category,
            raw_detail: err.detail,
        }
    }
}

/// Sends notification payloads through a configured transport.
///
/// Configuration is fixed at construction. A dispatcher built from a
/// [`ConfigError`] still answers every call, with a
/// [`FailureCategory::Configuration`] failure.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Result<Arc<dyn Transport>, ConfigError>,
}

impl Dispatcher {
    /// Dispatch through `transport`.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    /// Dispatch through an already shared transport.
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Ok(transport),
        }
    }

    /// A dispatcher whose configuration could not be loaded.
    pub fn unconfigured(err: ConfigError) -> Self {
        tracing::error!(error = %err, "Mail transport not configured");
        Self { transport: Err(err) }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_ok()
    }

    /// Name of the configured provider, or `"unconfigured"`.
    pub fn provider_name(&self) -> &'static str {
        match &self.transport {
            Ok(transport) => transport.provider_name(),
            Err(_) => "unconfigured",
        }
    }

    /// Check the transport can reach its server.
    pub async fn verify(&self) -> Result<(), TransportError> {
        match &self.transport {
            Ok(transport) => transport.verify().await,
            Err(err) => Err(err.clone().into()),
        }
    }

    /// Send one payload. Makes a single attempt; never retries.
    pub async fn send(&self, payload: &NotificationPayload) -> DeliveryOutcome {
        let provider = self.provider_name();
        let span = tracing::info_span!(
            "contact.dispatch",
            provider = provider,
            subject = %payload.subject(),
        );

        async move {
            #[cfg(feature = "metrics")]
            let start = Instant::now();

            let result = match &self.transport {
                Ok(transport) => {
                    tracing::debug!("Delivering notification");
                    transport.deliver(payload).await
                }
                Err(err) => Err(TransportError::from(err.clone())),
            };

            #[cfg(feature = "metrics")]
            {
                let duration = start.elapsed().as_secs_f64();
                metrics::histogram!("contact_dispatch_duration_seconds", "provider" => provider)
                    .record(duration);
            }

            match result {
                Ok(receipt) => {
                    tracing::info!(message_id = %receipt.message_id, "Notification delivered");
                    DeliveryOutcome::Success {
                        message_id: receipt.message_id,
                    }
                }
                Err(err) => {
                    tracing::error!(
                        category = %err.category,
                        detail = %err.detail,
                        "Notification delivery failed"
                    );
                    err.into()
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider_name())
            .finish()
    }
}
