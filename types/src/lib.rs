//! Core domain types for Signoff.
//!
//! This crate contains pure domain types with no IO and minimal dependencies:
//! record identity and state, the client directory, and resolved settings.

mod directory;
mod ids;
mod record;
mod settings;

pub use directory::{ClientDirectory, KnownClient, UnknownClientError, ValidationError};
pub use ids::{ClientId, RecordId};
pub use record::{ApprovalTransition, FIELD_COUNT, Record, RecordFields, RecordStatus};
pub use settings::{RawSmtpSettings, SmtpCredentials, SmtpSettings, SmtpSettingsError, TlsMode};
