//! Errors surfaced to the presentation layer.

use signoff_store::StoreError;
use signoff_types::{RecordId, ValidationError};
use thiserror::Error;

/// Failures the operator must see.
///
/// Notification problems are deliberately absent: they are logged by the
/// notifier and never reach this type.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl WorkflowError {
    /// Text for a blocking dialog.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::MissingClient | ValidationError::UnknownClient(_)) => {
                "Please select a valid client name".to_string()
            }
            Self::NotFound(id) => format!("Record {id} no longer exists"),
            Self::Storage(err) => format!("Could not save changes: {err}"),
        }
    }
}
