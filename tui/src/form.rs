//! Submission form state.

use signoff_engine::{ClientId, FIELD_COUNT, RecordFields};

/// Which form control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Client,
    Field(usize),
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            Self::Client => Self::Field(0),
            Self::Field(i) if i + 1 < FIELD_COUNT => Self::Field(i + 1),
            Self::Field(_) => Self::Client,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Client => Self::Field(FIELD_COUNT - 1),
            Self::Field(0) => Self::Client,
            Self::Field(i) => Self::Field(i - 1),
        }
    }
}

/// Client selector plus four free-text inputs.
///
/// The selector can only hold a directory key or nothing; free typing of a
/// client name is not possible.
#[derive(Debug, Clone)]
pub struct SubmitForm {
    clients: Vec<ClientId>,
    client: Option<usize>,
    fields: [String; FIELD_COUNT],
    focus: FormFocus,
}

impl SubmitForm {
    #[must_use]
    pub fn new(clients: Vec<ClientId>) -> Self {
        Self {
            clients,
            client: None,
            fields: Default::default(),
            focus: FormFocus::Client,
        }
    }

    #[must_use]
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    #[must_use]
    pub fn selected_client(&self) -> Option<&ClientId> {
        self.client.and_then(|i| self.clients.get(i))
    }

    /// Client id as the controller should see it; empty when unselected.
    #[must_use]
    pub fn client_input(&self) -> &str {
        self.selected_client().map_or("", ClientId::as_str)
    }

    pub fn next_client(&mut self) {
        if self.clients.is_empty() {
            return;
        }
        self.client = Some(match self.client {
            Some(i) => (i + 1) % self.clients.len(),
            None => 0,
        });
    }

    pub fn prev_client(&mut self) {
        if self.clients.is_empty() {
            return;
        }
        let last = self.clients.len() - 1;
        self.client = Some(match self.client {
            Some(0) | None => last,
            Some(i) => i - 1,
        });
    }

    #[must_use]
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    pub fn insert_char(&mut self, c: char) {
        if let FormFocus::Field(i) = self.focus {
            self.fields[i].push(c);
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        if let FormFocus::Field(i) = self.focus {
            // Inputs are single-line.
            self.fields[i].extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if let FormFocus::Field(i) = self.focus {
            self.fields[i].pop();
        }
    }

    #[must_use]
    pub fn record_fields(&self) -> RecordFields {
        RecordFields::from(self.fields.clone())
    }

    /// Reset to the initial empty state, focus on the selector.
    pub fn clear(&mut self) {
        self.client = None;
        self.fields = Default::default();
        self.focus = FormFocus::Client;
    }
}
