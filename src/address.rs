//! Email address type with optional display name.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Strict parsing rejected an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid email address")]
pub struct InvalidAddress(pub String);

/// An email address with an optional display name.
///
/// # Examples
///
/// ```
/// use contact_relay::Address;
///
/// let addr: Address = "office@example.com".into();
/// assert_eq!(addr.email, "office@example.com");
/// assert_eq!(addr.name, None);
///
/// let addr: Address = ("Website", "site@example.com").into();
/// assert_eq!(addr.formatted(), "Website <site@example.com>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Optional display name (e.g., "All Perspectives Website")
    pub name: Option<String>,
    /// Email address (e.g., "office@example.com")
    pub email: String,
}

impl Address {
    /// Create a new address with just an email.
    ///
    /// No validation is performed. Submitter addresses are checked by the
    /// validator and configured addresses go through [`Address::parse`].
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new address with a name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Parse and validate an email address.
    ///
    /// Uses RFC 5321/5322 compliant validation.
    ///
    /// ```
    /// use contact_relay::Address;
    ///
    /// assert!(Address::parse("office@example.com").is_ok());
    /// assert!(Address::parse("not-an-email").is_err());
    /// ```
    pub fn parse(email: &str) -> Result<Self, InvalidAddress> {
        if !EmailAddress::is_valid(email) {
            return Err(InvalidAddress(email.to_string()));
        }

        Ok(Self::new(email))
    }

    /// Parse and validate an email address with a display name.
    ///
    /// An empty name becomes `None`.
    pub fn parse_with_name(name: &str, email: &str) -> Result<Self, InvalidAddress> {
        let mut addr = Self::parse(email)?;
        if !name.is_empty() {
            addr.name = Some(name.to_string());
        }
        Ok(addr)
    }

    /// Format as "Name <email>" or just "email" if no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }

    /// Format according to RFC 5322 with proper escaping.
    ///
    /// Backslashes and double quotes in the name are escaped and the name is
    /// wrapped in double quotes: `"Name" <email>`.
    pub fn formatted_rfc5322(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => {
                // Escape backslashes first, then quotes
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\" <{}>", escaped, self.email)
            }
            None => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Self::with_name(name, email)
    }
}

impl From<(String, String)> for Address {
    fn from((name, email): (String, String)) -> Self {
        Self::with_name(name, email)
    }
}
