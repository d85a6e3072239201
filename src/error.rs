//! Error types for contact-relay.

use serde::Serialize;
use thiserror::Error;

/// A submitted contact field failed validation.
///
/// Rules are checked in a fixed order and the first failure wins, so callers
/// can rely on which variant is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name missing or shorter than 2 characters after trimming.
    #[error("Name is required (at least 2 characters)")]
    NameRequired,

    /// Email missing or not shaped like `local@domain.tld`.
    #[error("Please enter a valid email address")]
    EmailInvalid,

    /// No service code selected.
    #[error("Please select a service")]
    ServiceRequired,

    /// Message missing or shorter than 10 characters after trimming.
    #[error("Message is required (at least 10 characters)")]
    MessageRequired,
}

impl ValidationError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameRequired => "name_required",
            Self::EmailInvalid => "email_invalid",
            Self::ServiceRequired => "service_required",
            Self::MessageRequired => "message_required",
        }
    }
}

/// Configuration error (missing env var, invalid value, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// `CONTACT_PROVIDER` names a transport this crate does not know.
    #[error("Unknown CONTACT_PROVIDER: {0}. Valid providers are: smtp, local, logger")]
    UnknownProvider(String),

    /// The provider exists but its cargo feature is not compiled in.
    #[error(
        "CONTACT_PROVIDER={provider} but '{feature}' feature is not enabled. \
        Add `features = [\"{feature}\"]` to Cargo.toml"
    )]
    FeatureDisabled {
        provider: &'static str,
        feature: &'static str,
    },
}

/// Stable caller-facing classification of a failed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Required transport settings are absent.
    Configuration,
    /// The mail server rejected our credentials.
    Authentication,
    /// The mail server could not be reached or dropped the connection.
    Connection,
    /// The message could not be built or was refused as malformed.
    MalformedMessage,
    /// Anything not recognized above.
    Unknown,
}

impl FailureCategory {
    /// Identifier used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Connection => "connection",
            Self::MalformedMessage => "malformed_message",
            Self::Unknown => "unknown",
        }
    }

    /// Message safe to show to the person who filled in the form.
    ///
    /// Never includes transport detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration => "Email configuration not found",
            Self::Authentication => "Email authentication error",
            Self::Connection => "Could not connect to the email server",
            Self::MalformedMessage => "The message could not be formatted",
            Self::Unknown => "Internal server error",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a [`Transport`](crate::Transport).
///
/// `detail` holds the raw provider text. It is meant for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} error: {detail}")]
pub struct TransportError {
    pub category: FailureCategory,
    pub detail: String,
}

impl TransportError {
    pub fn new(category: FailureCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }

    pub fn authentication(detail: impl Into<String>) -> Self {
        Self::new(FailureCategory::Authentication, detail)
    }

    pub fn connection(detail: impl Into<String>) -> Self {
        Self::new(FailureCategory::Connection, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureCategory::MalformedMessage, detail)
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(FailureCategory::Unknown, detail)
    }
}

impl From<ConfigError> for TransportError {
    fn from(err: ConfigError) -> Self {
        Self::new(FailureCategory::Configuration, err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::error::Error> for TransportError {
    fn from(err: lettre::error::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::address::AddressError> for TransportError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::malformed(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        let category = crate::providers::classify_smtp_error(&err);
        Self::new(category, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes() {
        assert_eq!(ValidationError::NameRequired.code(), "name_required");
        assert_eq!(ValidationError::EmailInvalid.code(), "email_invalid");
        assert_eq!(ValidationError::ServiceRequired.code(), "service_required");
        assert_eq!(ValidationError::MessageRequired.code(), "message_required");
    }

    #[test]
    fn test_user_message_hides_detail() {
        let err = TransportError::authentication("535 5.7.8 Username and Password not accepted");
        assert_eq!(err.category, FailureCategory::Authentication);
        assert!(!err.category.user_message().contains("535"));
        assert!(err.to_string().contains("535"));
    }

    #[test]
    fn test_config_error_becomes_configuration_failure() {
        let err: TransportError = ConfigError::Missing("SMTP_HOST").into();
        assert_eq!(err.category, FailureCategory::Configuration);
        assert!(err.detail.contains("SMTP_HOST"));
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&FailureCategory::MalformedMessage).unwrap();
        assert_eq!(json, "\"malformed_message\"");
    }
}
