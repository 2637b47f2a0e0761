//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use signoff_engine::{
    ApprovalMessage, ClientDirectory, MailTransport, NotificationError, Notifier, RecordFields,
    RecordStore, WorkflowController,
};

/// Captures every message instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Rc<RefCell<Vec<ApprovalMessage>>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<ApprovalMessage> {
        self.sent.borrow().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, message: &ApprovalMessage) -> Result<(), NotificationError> {
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every send, counting attempts.
#[derive(Clone, Default)]
pub struct FailingTransport {
    attempts: Rc<RefCell<usize>>,
}

impl FailingTransport {
    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }
}

impl MailTransport for FailingTransport {
    fn send(&self, _message: &ApprovalMessage) -> Result<(), NotificationError> {
        *self.attempts.borrow_mut() += 1;
        Err(NotificationError::Other("relay unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// In-memory controller over the sample directory.
pub fn controller(transport: impl MailTransport + 'static) -> WorkflowController {
    WorkflowController::new(
        RecordStore::open_in_memory().expect("open in-memory store"),
        ClientDirectory::sample(),
        Notifier::new(transport),
    )
}

pub fn xyzw() -> RecordFields {
    RecordFields::new("x", "y", "z", "w")
}
