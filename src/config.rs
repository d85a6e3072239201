//! Startup configuration.
//!
//! Settings are read once, from the environment or from any key lookup, and
//! turned into the [`Composer`] and [`Dispatcher`] the pipeline runs with.
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `CONTACT_PROVIDER` | `smtp`, `local`, `logger`, `logger_full` (default: `smtp`) |
//! | `SMTP_HOST` | SMTP server host |
//! | `SMTP_PORT` | SMTP server port (default: 587, 465 uses implicit TLS) |
//! | `SMTP_USER` | SMTP login, also the default sender and recipient (`SMTP_USERNAME` also accepted) |
//! | `SMTP_PASSWORD` | SMTP password |
//! | `CONTACT_FROM` | Sender address (default: `SMTP_USER`) |
//! | `CONTACT_FROM_NAME` | Sender display name (default: `All Perspectives Website`) |
//! | `DESTINATION_EMAIL` | Where notifications go (default: `SMTP_USER`) |
//! | `CONTACT_SITE_NAME` | Site name shown in notifications (default: `All Perspectives`) |

use std::env;
use std::sync::Arc;

use crate::address::Address;
use crate::compose::{Composer, DEFAULT_SITE_NAME};
use crate::dispatch::Dispatcher;
use crate::error::ConfigError;
use crate::providers;
use crate::transport::Transport;

/// Sender display name when `CONTACT_FROM_NAME` is unset.
pub const DEFAULT_FROM_NAME: &str = "All Perspectives Website";

/// SMTP port when `SMTP_PORT` is unset.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Which transport delivers notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Smtp(SmtpSettings),
    Local,
    Logger { full: bool },
}

impl ProviderSettings {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Local => "local",
            Self::Logger { .. } => "logger",
        }
    }
}

/// SMTP relay settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the pipeline needs, resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub from: Address,
    pub recipient: Address,
    pub site_name: String,
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let smtp_user = get("SMTP_USER").or_else(|| get("SMTP_USERNAME"));

        let provider = match get("CONTACT_PROVIDER") {
            Some(name) => name.to_lowercase(),
            None => {
                tracing::debug!("CONTACT_PROVIDER not set, using smtp");
                "smtp".to_string()
            }
        };

        let provider = match provider.as_str() {
            "smtp" => {
                let host = get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?;
                let port = match get("SMTP_PORT") {
                    Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                        key: "SMTP_PORT",
                        reason: e.to_string(),
                    })?,
                    None => DEFAULT_SMTP_PORT,
                };
                let username = smtp_user.clone().ok_or(ConfigError::Missing("SMTP_USER"))?;
                let password = get("SMTP_PASSWORD").ok_or(ConfigError::Missing("SMTP_PASSWORD"))?;
                ProviderSettings::Smtp(SmtpSettings {
                    host,
                    port,
                    username,
                    password,
                })
            }
            "local" => ProviderSettings::Local,
            "logger" => ProviderSettings::Logger { full: false },
            "logger_full" => ProviderSettings::Logger { full: true },
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        };

        let from_email = get("CONTACT_FROM")
            .or_else(|| smtp_user.clone())
            .ok_or(ConfigError::Missing("CONTACT_FROM"))?;
        let from_name = get("CONTACT_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string());
        let from = parse_address("CONTACT_FROM", &from_email, Some(&from_name))?;

        let recipient_email = get("DESTINATION_EMAIL")
            .or(smtp_user)
            .ok_or(ConfigError::Missing("DESTINATION_EMAIL"))?;
        let recipient = parse_address("DESTINATION_EMAIL", &recipient_email, None)?;

        let site_name = get("CONTACT_SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());

        Ok(Self {
            provider,
            from,
            recipient,
            site_name,
        })
    }

    /// Composer addressed with these settings.
    pub fn composer(&self) -> Composer {
        Composer::new(self.recipient.clone(), self.from.clone()).site_name(self.site_name.clone())
    }

    /// Build the configured transport.
    pub fn transport(&self) -> Result<Arc<dyn Transport>, ConfigError> {
        match &self.provider {
            #[cfg(feature = "smtp")]
            ProviderSettings::Smtp(smtp) => {
                let transport = providers::SmtpTransport::new(&smtp.host, smtp.port)
                    .credentials(&smtp.username, &smtp.password)
                    .build()?;
                Ok(Arc::new(transport))
            }
            #[cfg(not(feature = "smtp"))]
            ProviderSettings::Smtp(_) => Err(ConfigError::FeatureDisabled {
                provider: "smtp",
                feature: "smtp",
            }),

            #[cfg(feature = "local")]
            ProviderSettings::Local => Ok(Arc::new(providers::LocalTransport::new())),
            #[cfg(not(feature = "local"))]
            ProviderSettings::Local => Err(ConfigError::FeatureDisabled {
                provider: "local",
                feature: "local",
            }),

            ProviderSettings::Logger { full } => {
                Ok(Arc::new(providers::LoggerTransport::new().log_full(*full)))
            }
        }
    }

    /// Dispatcher over the configured transport.
    ///
    /// A transport that cannot be built yields an unconfigured dispatcher.
    pub fn dispatcher(&self) -> Dispatcher {
        match self.transport() {
            Ok(transport) => {
                tracing::info!(provider = self.provider.name(), "Mail transport configured");
                Dispatcher::from_arc(transport)
            }
            Err(err) => Dispatcher::unconfigured(err),
        }
    }
}

fn parse_address(
    key: &'static str,
    email: &str,
    name: Option<&str>,
) -> Result<Address, ConfigError> {
    let parsed = match name {
        Some(name) => Address::parse_with_name(name, email),
        None => Address::parse(email),
    };
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
