//! Transport implementations.
//!
//! Each provider implements the [`Transport`](crate::Transport) trait.
//!
//! | Provider | Feature Flag | Description |
//! |----------|-------------|-------------|
//! | [`SmtpTransport`] | `smtp` | SMTP via lettre |
//! | [`LocalTransport`] | `local` | In-memory capture for dev/testing |
//! | [`LoggerTransport`] | (none) | Logs notifications without sending |

#[cfg(feature = "smtp")]
mod smtp;
#[cfg(feature = "smtp")]
pub(crate) use smtp::classify_smtp_error;
#[cfg(feature = "smtp")]
pub use smtp::{category_for_reply_code, SmtpBuilder, SmtpTransport, TlsMode};

#[cfg(feature = "local")]
mod local;
#[cfg(feature = "local")]
pub use local::LocalTransport;

mod logger;
pub use logger::LoggerTransport;
