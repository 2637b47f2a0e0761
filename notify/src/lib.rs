//! Approval notifications for Signoff.
//!
//! ```text
//! Notifier (best-effort, logs failures)
//! └── Box<dyn MailTransport>
//!     ├── SmtpMailer   (lettre, authenticated relay)
//!     └── LogTransport (no relay configured)
//! ```

mod message;
mod notifier;
mod smtp;
mod transport;

pub use message::ApprovalMessage;
pub use notifier::Notifier;
pub use smtp::SmtpMailer;
pub use transport::{LogTransport, MailTransport, NotificationError};
