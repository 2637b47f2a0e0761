//! End-to-end submit and approve flows against an in-memory store.

use signoff_engine::{RecordFields, RecordId, RecordStatus, ValidationError, WorkflowError};

use crate::common::{FailingTransport, RecordingTransport, controller, xyzw};

#[test]
fn submit_approve_notify_end_to_end() {
    let outbox = RecordingTransport::default();
    let mut controller = controller(outbox.clone());

    let id = controller.submit("Client A", xyzw()).unwrap();

    let pending = controller.fetch_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);
    assert_eq!(pending[0].client_id.as_str(), "Client A");
    assert_eq!(pending[0].fields.as_array(), ["x", "y", "z", "w"]);
    assert_eq!(pending[0].status, RecordStatus::Pending);

    controller.approve_record(id).unwrap();

    assert!(controller.fetch_pending().unwrap().is_empty());
    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "client-a@example.com");
    assert_eq!(sent[0].subject, "Data Approval Notification");
    for (n, value) in ["x", "y", "z", "w"].iter().enumerate() {
        let line = format!("Field {}: {value}", n + 1);
        assert!(sent[0].body.contains(&line), "missing {line:?}");
    }
}

#[test]
fn each_submission_adds_one_pending_record() {
    let mut controller = controller(RecordingTransport::default());

    for (n, client) in ["Client A", "Client B", "Client C", "Client A"]
        .into_iter()
        .enumerate()
    {
        controller
            .submit(client, RecordFields::new(n.to_string(), "", "", ""))
            .unwrap();
        assert_eq!(controller.fetch_pending().unwrap().len(), n + 1);
    }

    let ids: Vec<RecordId> = controller
        .fetch_pending()
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "pending records are listed in submission order");
}

#[test]
fn unknown_client_is_rejected_without_writes() {
    let mut controller = controller(RecordingTransport::default());
    controller.submit("Client B", xyzw()).unwrap();

    let err = controller.submit("Client Q", xyzw()).unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::UnknownClient(ref id)) if id.as_str() == "Client Q"
    ));
    assert_eq!(controller.fetch_pending().unwrap().len(), 1);
}

#[test]
fn blank_client_counts_as_missing() {
    let mut controller = controller(RecordingTransport::default());
    let err = controller.submit("   ", xyzw()).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::MissingClient)
    ));
    assert_eq!(err.user_message(), "Please select a valid client name");
}

#[test]
fn reapproval_is_a_silent_noop() {
    let outbox = RecordingTransport::default();
    let mut controller = controller(outbox.clone());
    let id = controller.submit("Client C", xyzw()).unwrap();

    let first = controller.approve_record(id).unwrap();
    let second = controller.approve_record(id).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.status, RecordStatus::Approved);
    assert_eq!(outbox.sent().len(), 1);
}

#[test]
fn approving_missing_record_does_not_notify() {
    let outbox = RecordingTransport::default();
    let mut controller = controller(outbox.clone());
    controller.submit("Client A", xyzw()).unwrap();

    let err = controller.approve_record(RecordId::new(404)).unwrap_err();

    assert!(matches!(err, WorkflowError::NotFound(id) if id == RecordId::new(404)));
    assert!(outbox.sent().is_empty());
    assert_eq!(controller.fetch_pending().unwrap().len(), 1);
}

#[test]
fn failed_notification_keeps_approval() {
    let relay = FailingTransport::default();
    let mut controller = controller(relay.clone());
    let keep = controller.submit("Client A", xyzw()).unwrap();
    let approve = controller.submit("Client B", xyzw()).unwrap();

    let record = controller.approve_record(approve).unwrap();

    assert_eq!(relay.attempts(), 1);
    assert_eq!(record.status, RecordStatus::Approved);
    let pending = controller.fetch_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, keep);
    assert_eq!(
        controller.record(approve).unwrap().unwrap().status,
        RecordStatus::Approved
    );
}
