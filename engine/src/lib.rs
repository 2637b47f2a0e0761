//! Approval workflow engine for Signoff.
//!
//! The [`WorkflowController`] owns the record store, the client directory
//! and the notifier, and is the only entry point the presentation layer
//! uses.

mod controller;
mod errors;
mod init;

pub use controller::WorkflowController;
pub use errors::WorkflowError;

pub use signoff_config::{ConfigError, SignoffConfig};
pub use signoff_notify::{ApprovalMessage, LogTransport, MailTransport, NotificationError, Notifier};
pub use signoff_store::{RecordStore, StoreError};
pub use signoff_types::{
    ClientDirectory, ClientId, FIELD_COUNT, Record, RecordFields, RecordId, RecordStatus,
    ValidationError,
};
