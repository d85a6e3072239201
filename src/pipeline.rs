//! The intake pipeline: validate, compose, dispatch.
//!
//! Each call to [`ContactPipeline::submit`] is an independent pass through
//! the [`Stage`]s. Nothing is shared between submissions except the
//! read-only composer and dispatcher.

use serde::Serialize;

use crate::compose::Composer;
use crate::config::Settings;
use crate::dispatch::{DeliveryOutcome, Dispatcher};
use crate::error::{ConfigError, FailureCategory};
use crate::submission::{validate, RawSubmission};

/// Where a submission is in the pipeline.
///
/// Stages only move forward. `Rejected`, `Delivered` and `DeliveryFailed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Received,
    Validating,
    Rejected,
    Validated,
    Composing,
    Composed,
    Dispatching,
    Delivered,
    DeliveryFailed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Validated => "validated",
            Self::Composing => "composing",
            Self::Composed => "composed",
            Self::Dispatching => "dispatching",
            Self::Delivered => "delivered",
            Self::DeliveryFailed => "delivery_failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Delivered | Self::DeliveryFailed)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Received => 0,
            Self::Validating => 1,
            Self::Rejected | Self::Validated => 2,
            Self::Composing => 3,
            Self::Composed => 4,
            Self::Dispatching => 5,
            Self::Delivered | Self::DeliveryFailed => 6,
        }
    }

    /// Whether moving from `self` to `next` keeps the pipeline moving forward.
    ///
    /// `Rejected` is only reachable from `Validating`, the delivery outcomes
    /// only from `Dispatching`.
    pub fn can_advance_to(&self, next: Stage) -> bool {
        if self.is_terminal() || next.rank() <= self.rank() {
            return false;
        }
        match next {
            Self::Rejected => *self == Self::Validating,
            Self::Validated => *self == Self::Validating,
            Self::Delivered => *self == Self::Dispatching,
            Self::DeliveryFailed => *self == Self::Dispatching,
            _ => next.rank() == self.rank() + 1,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the form gets back.
///
/// Serializes as `{"ok": true, "messageId": "..."}` or
/// `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Terminal stage the submission reached.
    #[serde(skip)]
    pub stage: Stage,
    /// Set when delivery failed.
    #[serde(skip)]
    pub category: Option<FailureCategory>,
}

impl ContactResponse {
    fn delivered(message_id: String) -> Self {
        Self {
            ok: true,
            error: None,
            message_id: Some(message_id),
            stage: Stage::Delivered,
            category: None,
        }
    }

    fn rejected(error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
            message_id: None,
            stage: Stage::Rejected,
            category: None,
        }
    }

    fn failed(category: FailureCategory) -> Self {
        Self {
            ok: false,
            error: Some(category.user_message().to_string()),
            message_id: None,
            stage: Stage::DeliveryFailed,
            category: Some(category),
        }
    }
}

/// Tracks one submission's stage and logs each step.
struct Progress {
    stage: Stage,
}

impl Progress {
    fn new() -> Self {
        tracing::debug!(stage = %Stage::Received, "Submission received");
        Self {
            stage: Stage::Received,
        }
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal stage transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, to = %next, "Submission stage changed");
        self.stage = next;
    }
}

/// Validates, composes and dispatches contact submissions.
///
/// # Example
///
/// ```rust,ignore
/// use contact_relay::{ContactPipeline, RawSubmission};
///
/// let pipeline = ContactPipeline::from_env();
/// let response = pipeline.submit(&raw).await;
/// if response.ok {
///     println!("sent as {:?}", response.message_id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ContactPipeline {
    composer: Result<Composer, ConfigError>,
    dispatcher: Dispatcher,
}

impl ContactPipeline {
    pub fn new(composer: Composer, dispatcher: Dispatcher) -> Self {
        Self {
            composer: Ok(composer),
            dispatcher,
        }
    }

    /// Pipeline for loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.composer(), settings.dispatcher())
    }

    /// Pipeline that validates input but fails every delivery with a
    /// configuration error.
    pub fn unconfigured(err: ConfigError) -> Self {
        Self {
            composer: Err(err.clone()),
            dispatcher: Dispatcher::unconfigured(err),
        }
    }

    /// Load settings from the environment.
    ///
    /// Never fails: missing configuration shows up on each submission instead.
    pub fn from_env() -> Self {
        match Settings::from_env() {
            Ok(settings) => Self::from_settings(&settings),
            Err(err) => Self::unconfigured(err),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one submission through the pipeline.
    pub async fn submit(&self, raw: &RawSubmission) -> ContactResponse {
        let response = self.run(raw).await;

        #[cfg(feature = "metrics")]
        metrics::counter!("contact_submissions_total", "outcome" => response.stage.as_str())
            .increment(1);

        response
    }

    async fn run(&self, raw: &RawSubmission) -> ContactResponse {
        let mut progress = Progress::new();

        progress.enter(Stage::Validating);
        let submission = match validate(raw) {
            Ok(submission) => submission,
            Err(err) => {
                progress.enter(Stage::Rejected);
                tracing::info!(code = err.code(), "Submission rejected");
                return ContactResponse::rejected(err.to_string());
            }
        };
        progress.enter(Stage::Validated);

        progress.enter(Stage::Composing);
        let payload = self
            .composer
            .as_ref()
            .map(|composer| composer.compose(&submission));
        progress.enter(Stage::Composed);

        progress.enter(Stage::Dispatching);
        let outcome = match payload {
            Ok(payload) => self.dispatcher.send(&payload).await,
            Err(err) => {
                tracing::error!(error = %err, "Cannot dispatch notification without configuration");
                DeliveryOutcome::Failure {
                    category: FailureCategory::Configuration,
                    raw_detail: err.to_string(),
                }
            }
        };
        match outcome {
            DeliveryOutcome::Success { message_id } => {
                progress.enter(Stage::Delivered);
                ContactResponse::delivered(message_id)
            }
            DeliveryOutcome::Failure { category, .. } => {
                progress.enter(Stage::DeliveryFailed);
                ContactResponse::failed(category)
            }
        }
    }
}
