//! Keyboard-driven runs of the terminal screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use signoff_tui::{APPROVED_MESSAGE, App, SUBMITTED_MESSAGE, Tab, draw, handle_key};

use crate::common::{RecordingTransport, controller};

fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn operator_submits_and_approves() {
    let outbox = RecordingTransport::default();
    let mut app = App::new(controller(outbox.clone()));

    press(&mut app, KeyCode::Right);
    for value in ["x", "y", "z", "w"] {
        press(&mut app, KeyCode::Down);
        type_text(&mut app, value);
    }
    press(&mut app, KeyCode::Enter);
    assert!(screen(&mut app).contains(SUBMITTED_MESSAGE));
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.tab(), Tab::Review);
    let review = screen(&mut app);
    assert!(review.contains("Pending (1)"));
    assert!(review.contains("Client A"));

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    let after = screen(&mut app);
    assert!(after.contains(APPROVED_MESSAGE));
    assert!(!after.contains("email"));
    assert_eq!(outbox.sent().len(), 1);
    assert_eq!(outbox.sent()[0].to, "client-a@example.com");

    press(&mut app, KeyCode::Esc);
    assert!(screen(&mut app).contains("No records awaiting approval"));
    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit());
}

#[test]
fn submit_without_client_shows_error() {
    let mut app = App::new(controller(RecordingTransport::default()));
    press(&mut app, KeyCode::Down);
    type_text(&mut app, "orphan");
    press(&mut app, KeyCode::Enter);

    assert!(screen(&mut app).contains("Please select a valid client name"));
    assert!(app.pending().is_empty());
}
