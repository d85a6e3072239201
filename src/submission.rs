//! Inbound contact records and field validation.
//!
//! The form posts a flat, untyped record. [`RawSubmission`] takes it as-is
//! (non-string values are treated as absent) and [`validate`] turns it into a
//! [`ContactSubmission`] or rejects it with the first failing rule.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::service::ServiceCode;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(EMAIL_PATTERN)
        .unwrap_or_else(|e| panic!("Invalid regex pattern '{}': {}", EMAIL_PATTERN, e))
});

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

/// The record as submitted by the form, before any checks.
///
/// Older form builds posted Portuguese field names; both spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSubmission {
    #[serde(alias = "nome", deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(alias = "telefone", deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(alias = "servico", alias = "serviceCode", deserialize_with = "lenient_string")]
    pub service: Option<String>,
    #[serde(alias = "mensagem", deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

impl RawSubmission {
    /// Build from a plain key-value map, e.g. a decoded urlencoded form.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| map.get(*key))
                .map(|value| value.to_string())
        };

        Self {
            name: get(&["name", "nome"]),
            email: get(&["email"]),
            phone: get(&["phone", "telefone"]),
            service: get(&["service", "serviceCode", "servico"]),
            message: get(&["message", "mensagem"]),
        }
    }
}

/// Accept any JSON value, keeping only strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// A submission that passed every rule.
///
/// Only [`validate`] constructs one, so holding a `ContactSubmission` means
/// all required fields are present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: String,
    phone: Option<String>,
    service: ServiceCode,
    message: String,
}

impl ContactSubmission {
    /// Trimmed submitter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number, if one was given. Blank input counts as absent.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn service(&self) -> &ServiceCode {
        &self.service
    }

    /// Message text, trimmed at both ends. Inner line breaks are kept.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Check a raw record.
///
/// Rules run in order and stop at the first failure:
///
/// 1. name, trimmed, at least 2 characters
/// 2. email shaped like `local@domain.tld`
/// 3. service code non-empty
/// 4. message, trimmed, at least 10 characters
///
/// Phone is optional and never checked.
///
/// ```
/// use contact_relay::{validate, RawSubmission, ValidationError};
///
/// let raw = RawSubmission {
///     name: Some("A".into()),
///     email: Some("a@b.com".into()),
///     service: Some("other".into()),
///     message: Some("Hello there, thanks".into()),
///     ..Default::default()
/// };
/// assert_eq!(validate(&raw), Err(ValidationError::NameRequired));
/// ```
pub fn validate(raw: &RawSubmission) -> Result<ContactSubmission, ValidationError> {
    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| name.chars().count() >= MIN_NAME_CHARS)
        .ok_or(ValidationError::NameRequired)?;

    let email = raw
        .email
        .as_deref()
        .filter(|email| EMAIL_SHAPE.is_match(email))
        .ok_or(ValidationError::EmailInvalid)?;

    let service = raw
        .service
        .as_deref()
        .filter(|service| !service.is_empty())
        .ok_or(ValidationError::ServiceRequired)?;

    let message = raw
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| message.chars().count() >= MIN_MESSAGE_CHARS)
        .ok_or(ValidationError::MessageRequired)?;

    let phone = raw
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string);

    Ok(ContactSubmission {
        name: name.to_string(),
        email: email.to_string(),
        phone,
        service: ServiceCode::parse(service),
        message: message.to_string(),
    })
}

/// Build a submission that is known to be valid.
#[cfg(test)]
pub(crate) fn submission(
    name: &str,
    email: &str,
    phone: Option<&str>,
    service: &str,
    message: &str,
) -> ContactSubmission {
    validate(&RawSubmission {
        name: Some(name.into()),
        email: Some(email.into()),
        phone: phone.map(Into::into),
        service: Some(service.into()),
        message: Some(message.into()),
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str, service: &str, message: &str) -> RawSubmission {
        RawSubmission {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: None,
            service: Some(service.into()),
            message: Some(message.into()),
        }
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert_eq!(EMAIL_SHAPE.as_str(), EMAIL_PATTERN);
        assert!(EMAIL_SHAPE.is_match("jo@x.com"));
    }

    #[test]
    fn test_minimum_lengths_pass() {
        let raw = RawSubmission {
            phone: Some(String::new()),
            ..record("Jo", "jo@x.com", "inspections", "Please call me back")
        };
        let submission = validate(&raw).unwrap();

        assert_eq!(submission.name(), "Jo");
        assert_eq!(submission.phone(), None);
        assert_eq!(submission.service(), &ServiceCode::Inspections);
    }

    #[test]
    fn test_short_name_rejected_regardless_of_other_fields() {
        for name in ["", " ", "A", "  B  "] {
            let bad_everything = record(name, "nope", "", "short");
            assert_eq!(validate(&bad_everything), Err(ValidationError::NameRequired));

            let good_rest = record(name, "a@b.com", "other", "Hello there, thanks");
            assert_eq!(validate(&good_rest), Err(ValidationError::NameRequired));
        }
    }

    #[test]
    fn test_missing_name_rejected() {
        let raw = RawSubmission {
            name: None,
            ..record("x", "a@b.com", "other", "Hello there, thanks")
        };
        assert_eq!(validate(&raw), Err(ValidationError::NameRequired));
    }

    #[test]
    fn test_email_shape() {
        for email in [
            "not-an-email",
            "ana@domain",
            "ana.silva.com",
            "ana @x.com",
            "ana@x .com",
            "@x.com",
            "ana@.",
            "",
        ] {
            let raw = record("Ana Silva", email, "other", "Looking for a quote please");
            assert_eq!(validate(&raw), Err(ValidationError::EmailInvalid), "{email}");
        }

        for email in ["ana@x.com", "a.b+c@sub.domain.pt", "a@b.c"] {
            let raw = record("Ana Silva", email, "other", "Looking for a quote please");
            assert!(validate(&raw).is_ok(), "{email}");
        }
    }

    #[test]
    fn test_service_required() {
        let raw = record("Ana Silva", "ana@x.com", "", "Looking for a quote please");
        assert_eq!(validate(&raw), Err(ValidationError::ServiceRequired));
    }

    #[test]
    fn test_short_message_rejected() {
        for message in ["", "too short", "   123456789   ", "\n\n\n\n\n\n\n\n\n\n\n"] {
            let raw = record("Ana Silva", "ana@x.com", "other", message);
            assert_eq!(validate(&raw), Err(ValidationError::MessageRequired));
        }

        let raw = record("Ana Silva", "ana@x.com", "other", "  1234567890  ");
        assert_eq!(validate(&raw).unwrap().message(), "1234567890");
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let raw = record("Zé", "ze@x.com", "other", "Olá, preciso de orçamento");
        assert!(validate(&raw).is_ok());

        let raw = record("É", "e@x.com", "other", "Olá, preciso de orçamento");
        assert_eq!(validate(&raw), Err(ValidationError::NameRequired));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let raw = record("Ana Silva", "not-an-email", "other", "Looking for a quote please");
        assert_eq!(validate(&raw), validate(&raw));
    }

    #[test]
    fn test_unknown_service_is_kept() {
        let raw = record("Ana Silva", "ana@x.com", "mapping", "Looking for a quote please");
        let submission = validate(&raw).unwrap();
        assert_eq!(
            submission.service(),
            &ServiceCode::Unrecognized("mapping".into())
        );
    }

    #[test]
    fn test_deserialize_untyped_record() {
        let json = serde_json::json!({
            "nome": "Ana Silva",
            "email": "ana@x.com",
            "telefone": 912345678,
            "servico": "paineis",
            "mensagem": "Looking for a quote please",
            "extra": true
        });
        let raw: RawSubmission = serde_json::from_value(json).unwrap();

        assert_eq!(raw.name.as_deref(), Some("Ana Silva"));
        assert_eq!(raw.phone, None);
        assert_eq!(raw.service.as_deref(), Some("paineis"));

        let submission = validate(&raw).unwrap();
        assert_eq!(submission.service(), &ServiceCode::SolarPanels);
    }

    #[test]
    fn test_null_fields_are_absent() {
        let json = serde_json::json!({ "name": null, "email": "a@b.com" });
        let raw: RawSubmission = serde_json::from_value(json).unwrap();
        assert_eq!(raw.name, None);
        assert_eq!(validate(&raw), Err(ValidationError::NameRequired));
    }

    #[test]
    fn test_from_map() {
        let map = HashMap::from([
            ("name".to_string(), "Jo".to_string()),
            ("email".to_string(), "jo@x.com".to_string()),
            ("servico".to_string(), "outro".to_string()),
            ("message".to_string(), "Please call me back".to_string()),
        ]);
        let raw = RawSubmission::from_map(&map);
        assert_eq!(raw.service.as_deref(), Some("outro"));
        assert_eq!(validate(&raw).unwrap().service(), &ServiceCode::Other);
    }
}
