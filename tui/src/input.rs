//! Key bindings.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Tab};
use crate::form::FormFocus;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Wait briefly for terminal input and apply it.
pub fn handle_events(app: &mut App) -> Result<()> {
    if !event::poll(INPUT_POLL_TIMEOUT)? {
        return Ok(());
    }
    match event::read()? {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => handle_paste(app, &text),
        _ => {}
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.kind, KeyEventKind::Release) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    if app.modal().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_modal();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.request_quit(),
        KeyCode::Tab | KeyCode::BackTab => app.switch_tab(),
        _ => match app.tab() {
            Tab::Submit => handle_submit_key(app, key),
            Tab::Review => handle_review_key(app, key),
        },
    }
}

fn handle_submit_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.submit();
        return;
    }

    let form = app.form_mut();
    match key.code {
        KeyCode::Up => form.focus_prev(),
        KeyCode::Down => form.focus_next(),
        KeyCode::Left if form.focus() == FormFocus::Client => form.prev_client(),
        KeyCode::Right if form.focus() == FormFocus::Client => form.next_client(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            form.insert_char(c);
        }
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter | KeyCode::Char('a') => app.approve_selected(),
        KeyCode::Char('r') => app.refresh_pending(),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.modal().is_none() && app.tab() == Tab::Submit {
        app.form_mut().insert_str(text);
    }
}
