//! Screen state and the actions the key bindings trigger.

use ratatui::widgets::TableState;
use signoff_engine::{ClientId, Record, WorkflowController, WorkflowError};

use crate::form::SubmitForm;

pub const SUBMITTED_MESSAGE: &str = "Data submitted successfully";
pub const APPROVED_MESSAGE: &str = "Data approved";
pub const NO_SELECTION_MESSAGE: &str = "Please select an item to approve";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Submit,
    Review,
}

impl Tab {
    pub const ALL: [Self; 2] = [Self::Submit, Self::Review];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Review => "Review",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Submit => 0,
            Self::Review => 1,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Submit => Self::Review,
            Self::Review => Self::Submit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Info,
    Warning,
    Error,
}

impl ModalKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Info => " Info ",
            Self::Warning => " Warning ",
            Self::Error => " Error ",
        }
    }
}

/// Blocking dialog. While one is open, keys other than dismiss are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub message: String,
}

impl Modal {
    fn new(kind: ModalKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub struct App {
    controller: WorkflowController,
    tab: Tab,
    form: SubmitForm,
    pending: Vec<Record>,
    table: TableState,
    modal: Option<Modal>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(controller: WorkflowController) -> Self {
        let clients: Vec<ClientId> = controller.clients().cloned().collect();
        let mut app = Self {
            controller,
            tab: Tab::Submit,
            form: SubmitForm::new(clients),
            pending: Vec::new(),
            table: TableState::default(),
            modal: None,
            should_quit: false,
        };
        app.refresh_pending();
        app
    }

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.toggled();
        if self.tab == Tab::Review {
            self.refresh_pending();
        }
    }

    #[must_use]
    pub fn form(&self) -> &SubmitForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmitForm {
        &mut self.form
    }

    #[must_use]
    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    pub(crate) fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    #[must_use]
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn select_next(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let next = match self.table.selected() {
            Some(i) if i + 1 < self.pending.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let prev = self.table.selected().map_or(0, |i| i.saturating_sub(1));
        self.table.select(Some(prev));
    }

    /// Submit the form as a new pending record.
    pub fn submit(&mut self) {
        let client = self.form.client_input().to_string();
        match self.controller.submit(&client, self.form.record_fields()) {
            Ok(_) => {
                self.form.clear();
                self.refresh_pending();
                self.modal = Some(Modal::new(ModalKind::Info, SUBMITTED_MESSAGE));
            }
            Err(err) => self.show_error(&err),
        }
    }

    /// Approve the highlighted row.
    pub fn approve_selected(&mut self) {
        let Some(record) = self.table.selected().and_then(|i| self.pending.get(i)) else {
            self.modal = Some(Modal::new(ModalKind::Warning, NO_SELECTION_MESSAGE));
            return;
        };
        let id = record.id;

        let result = self.controller.approve_record(id);
        // The row is stale either way.
        self.refresh_pending();
        match result {
            Ok(_) => self.modal = Some(Modal::new(ModalKind::Info, APPROVED_MESSAGE)),
            Err(err) => self.show_error(&err),
        }
    }

    /// Reload the review queue, keeping the selection in range.
    pub fn refresh_pending(&mut self) {
        match self.controller.fetch_pending() {
            Ok(records) => self.pending = records,
            Err(err) => {
                self.pending.clear();
                self.show_error(&err);
            }
        }

        let selected = match self.table.selected() {
            _ if self.pending.is_empty() => None,
            Some(i) => Some(i.min(self.pending.len() - 1)),
            None => None,
        };
        self.table.select(selected);
    }

    fn show_error(&mut self, err: &WorkflowError) {
        tracing::warn!("{err}");
        self.modal = Some(Modal::new(ModalKind::Error, err.user_message()));
    }
}
