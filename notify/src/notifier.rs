//! Best-effort approval notifications.
//!
//! [`Notifier::notify`] returns nothing. A transport or lookup failure is
//! logged at `warn` and dropped: approval has already been committed when
//! this runs and is never rolled back.
//!
//! Known weak point: the operator sees nothing when a notification is lost.
//! The failure exists only in the log file and is not retried.

use signoff_types::{ClientDirectory, ClientId, RecordFields};

use crate::message::ApprovalMessage;
use crate::transport::{MailTransport, NotificationError};

pub struct Notifier {
    transport: Box<dyn MailTransport>,
}

impl Notifier {
    pub fn new(transport: impl MailTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    #[must_use]
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Tell `client_id` that its record was approved.
    pub fn notify(
        &self,
        directory: &ClientDirectory,
        client_id: &ClientId,
        fields: &RecordFields,
    ) {
        match self.try_notify(directory, client_id, fields) {
            Ok(to) => {
                tracing::info!(
                    client = %client_id,
                    to = %to,
                    transport = self.transport.name(),
                    "Approval notification sent"
                );
            }
            Err(err) => {
                tracing::warn!(
                    client = %client_id,
                    transport = self.transport.name(),
                    "Failed to send approval notification: {err}"
                );
            }
        }
    }

    fn try_notify(
        &self,
        directory: &ClientDirectory,
        client_id: &ClientId,
        fields: &RecordFields,
    ) -> Result<String, NotificationError> {
        let address = directory.resolve(client_id.as_str())?;
        let message = ApprovalMessage::new(address, fields);
        self.transport.send(&message)?;
        Ok(message.to)
    }
}
