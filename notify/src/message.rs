use signoff_types::RecordFields;

pub(crate) const APPROVAL_SUBJECT: &str = "Data Approval Notification";

/// A rendered notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ApprovalMessage {
    #[must_use]
    pub fn new(to: impl Into<String>, fields: &RecordFields) -> Self {
        Self {
            to: to.into(),
            subject: APPROVAL_SUBJECT.to_string(),
            body: render_body(fields),
        }
    }
}

/// Plain-text body listing each field on its own line.
#[must_use]
pub(crate) fn render_body(fields: &RecordFields) -> String {
    let mut body = String::from("Your data has been approved:");
    for (index, value) in fields.as_array().into_iter().enumerate() {
        body.push_str(&format!("\nField {}: {value}", index + 1));
    }
    body
}
