//! Submitted records and their approval state.

use crate::ids::{ClientId, RecordId};

/// Number of free-text fields carried by every record.
pub const FIELD_COUNT: usize = 4;

/// The four opaque text fields of a submission.
///
/// Contents are never interpreted; empty strings are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub field1: String,
    pub field2: String,
    pub field3: String,
    pub field4: String,
}

impl RecordFields {
    #[must_use]
    pub fn new(
        field1: impl Into<String>,
        field2: impl Into<String>,
        field3: impl Into<String>,
        field4: impl Into<String>,
    ) -> Self {
        Self {
            field1: field1.into(),
            field2: field2.into(),
            field3: field3.into(),
            field4: field4.into(),
        }
    }

    /// Fields in display order.
    #[must_use]
    pub fn as_array(&self) -> [&str; FIELD_COUNT] {
        [&self.field1, &self.field2, &self.field3, &self.field4]
    }
}

impl From<[String; FIELD_COUNT]> for RecordFields {
    fn from([field1, field2, field3, field4]: [String; FIELD_COUNT]) -> Self {
        Self {
            field1,
            field2,
            field3,
            field4,
        }
    }
}

/// Where a record sits in the approval workflow.
///
/// `Pending -> Approved` is the only transition and it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Pending,
    Approved,
}

impl RecordStatus {
    #[must_use]
    pub const fn from_approved(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Pending
        }
    }
}

/// A persisted workflow item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub client_id: ClientId,
    pub fields: RecordFields,
    pub status: RecordStatus,
}

/// Result of asking the store to approve a record.
///
/// Re-approving is a silent no-op: the store reports `AlreadyApproved`
/// without writing, and callers must not re-run approval side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalTransition {
    /// The record moved from pending to approved by this call.
    Approved(Record),
    /// The record was approved by an earlier call.
    AlreadyApproved(Record),
}
