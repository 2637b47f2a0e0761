//! Delivery seam between the notifier and the outside world.

use thiserror::Error;

use signoff_types::UnknownClientError;

use crate::message::ApprovalMessage;

/// Why a notification did not go out.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    UnknownClient(#[from] UnknownClientError),
    #[error("invalid mail address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp relay error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("{0}")]
    Other(String),
}

/// Something that can deliver a rendered [`ApprovalMessage`].
///
/// Implementations report failures; deciding what to do with them is the
/// notifier's job.
pub trait MailTransport {
    fn send(&self, message: &ApprovalMessage) -> Result<(), NotificationError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Transport used when no relay is configured: logs instead of sending.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, message: &ApprovalMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "No SMTP relay configured; notification logged only"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
