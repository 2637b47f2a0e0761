//! Workflow Controller - the approval state machine.
//!
//! ```text
//! submit ──► Pending ──approve_record──► Approved (terminal)
//!                                          │
//!                                          └─► notify (best effort, after commit)
//! ```
//!
//! Approval is committed to the store first. The notification runs
//! afterwards, outside the storage transaction, and its failure never undoes
//! or blocks the approval.

use signoff_notify::Notifier;
use signoff_store::RecordStore;
use signoff_types::{ApprovalTransition, ClientDirectory, ClientId, Record, RecordFields, RecordId};

use crate::errors::WorkflowError;

pub struct WorkflowController {
    store: RecordStore,
    directory: ClientDirectory,
    notifier: Notifier,
}

impl WorkflowController {
    #[must_use]
    pub fn new(store: RecordStore, directory: ClientDirectory, notifier: Notifier) -> Self {
        Self {
            store,
            directory,
            notifier,
        }
    }

    /// Directory keys, for constraining the client selector.
    pub fn clients(&self) -> impl Iterator<Item = &ClientId> {
        self.directory.client_ids()
    }

    /// Record a new submission as pending.
    ///
    /// An empty or unknown client is rejected before anything is written.
    pub fn submit(
        &mut self,
        client_id: &str,
        fields: RecordFields,
    ) -> Result<RecordId, WorkflowError> {
        let client = self.directory.verify(client_id).inspect_err(|err| {
            tracing::info!(client = client_id, "Rejected submission: {err}");
        })?;

        let id = self.store.create(&client, &fields)?;
        tracing::info!(record_id = %id, client = %client.id(), "Record submitted");
        Ok(id)
    }

    /// Approve a pending record and notify its client.
    ///
    /// Re-approving an approved record is a no-op: it succeeds, returns the
    /// record, and sends nothing. An unknown id fails without notifying.
    pub fn approve_record(&mut self, id: RecordId) -> Result<Record, WorkflowError> {
        let transition = self.store.approve(id)?;

        let record = match transition {
            ApprovalTransition::AlreadyApproved(record) => {
                tracing::info!(record_id = %id, "Record already approved; nothing to do");
                return Ok(record);
            }
            ApprovalTransition::Approved(record) => record,
        };
        tracing::info!(record_id = %id, client = %record.client_id, "Record approved");

        // Committed above. Delivery problems are logged by the notifier.
        self.notifier.notify(&self.directory, &record.client_id, &record.fields);

        Ok(record)
    }

    /// Snapshot of the review queue.
    pub fn fetch_pending(&self) -> Result<Vec<Record>, WorkflowError> {
        Ok(self.store.list_pending()?)
    }

    pub fn record(&self, id: RecordId) -> Result<Option<Record>, WorkflowError> {
        Ok(self.store.get(id)?)
    }
}
