//! SMTP transport using lettre.
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_relay::providers::SmtpTransport;
//!
//! // STARTTLS on 587 with authentication
//! let transport = SmtpTransport::new("smtp.example.com", 587)
//!     .credentials("site@example.com", "password")
//!     .build()?;
//! ```

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::address::Address;
use crate::compose::NotificationPayload;
use crate::error::{ConfigError, FailureCategory, TransportError};
use crate::transport::{DeliveryReceipt, Transport};

/// Port on which the server expects TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP transport.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Create a new SMTP transport builder.
    ///
    /// Port 465 uses implicit TLS, any other port STARTTLS.
    pub fn new(host: &str, port: u16) -> SmtpBuilder {
        SmtpBuilder {
            host: host.to_string(),
            port,
            credentials: None,
            tls: if port == IMPLICIT_TLS_PORT {
                TlsMode::Tls
            } else {
                TlsMode::StartTls
            },
        }
    }

    /// Build a lettre Message from the payload.
    fn build_message(&self, payload: &NotificationPayload) -> Result<Message, TransportError> {
        let message = Message::builder()
            .from(address_to_mailbox(payload.from())?)
            .to(address_to_mailbox(payload.recipient())?)
            .reply_to(address_to_mailbox(payload.reply_to())?)
            .subject(payload.subject())
            .multipart(MultiPart::alternative_plain_html(
                payload.text_body().to_string(),
                payload.html_body().to_string(),
            ))?;

        Ok(message)
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, TransportError> {
        let message = self.build_message(payload)?;

        let response = self.transport.send(message).await?;

        // Extract message ID from SMTP response, or generate one
        let message_id = response
            .message()
            .next()
            .and_then(|m| m.lines().next())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeliveryReceipt::new(message_id))
    }

    async fn verify(&self) -> Result<(), TransportError> {
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(TransportError::connection("SMTP server did not accept NOOP"))
        }
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}

/// TLS mode for SMTP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// No TLS (dangerous, only for localhost)
    None,
    /// STARTTLS - upgrade to TLS after connecting (port 587)
    StartTls,
    /// Implicit TLS - connect with TLS from start (port 465)
    Tls,
}

/// Builder for SmtpTransport.
pub struct SmtpBuilder {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    tls: TlsMode,
}

impl SmtpBuilder {
    /// Set SMTP credentials.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    /// Set TLS mode.
    pub fn tls(mut self, mode: TlsMode) -> Self {
        self.tls = mode;
        self
    }

    /// Build the SmtpTransport.
    ///
    /// Fails if TLS parameters cannot be set up for the host.
    pub fn build(self) -> Result<SmtpTransport, ConfigError> {
        let builder = match self.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| ConfigError::Invalid {
                    key: "SMTP_HOST",
                    reason: e.to_string(),
                })?,
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host).map_err(
                |e| ConfigError::Invalid {
                    key: "SMTP_HOST",
                    reason: e.to_string(),
                },
            )?,
        };

        let mut builder = builder.port(self.port);
        if let Some(creds) = self.credentials {
            builder = builder.credentials(creds);
        }

        Ok(SmtpTransport {
            transport: builder.build(),
        })
    }
}

/// Convert our Address to lettre's Mailbox.
fn address_to_mailbox(addr: &Address) -> Result<Mailbox, TransportError> {
    let email: lettre::Address = addr.email.parse()?;
    Ok(Mailbox::new(addr.name.clone(), email))
}

/// Map an SMTP reply code onto a failure category.
///
/// Only codes with a clear meaning are mapped; the rest return `None`.
pub fn category_for_reply_code(code: u16) -> Option<FailureCategory> {
    match code {
        // Authentication required / too weak / credentials invalid / encryption required
        454 | 530 | 534 | 535 | 538 => Some(FailureCategory::Authentication),
        // Service not available, closing channel
        420 | 421 => Some(FailureCategory::Connection),
        // Syntax errors, bad sequence, size exceeded, mailbox name or content rejected
        500 | 501 | 502 | 503 | 552 | 553 | 554 => Some(FailureCategory::MalformedMessage),
        _ => None,
    }
}

/// Classify a lettre SMTP error.
///
/// Reply codes are checked first. Without a mapped code, timeouts, TLS
/// failures and any I/O error in the source chain count as connection
/// failures.
pub(crate) fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> FailureCategory {
    let by_code = err
        .status()
        .and_then(|code| code.to_string().parse::<u16>().ok())
        .and_then(category_for_reply_code);
    if let Some(category) = by_code {
        return category;
    }

    if err.is_timeout() || err.is_tls() || has_io_source(err) {
        return FailureCategory::Connection;
    }

    FailureCategory::Unknown
}

fn has_io_source(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}
