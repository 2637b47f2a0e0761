//! Terminal screens for Signoff using ratatui.
//!
//! ```text
//! ┌ Submit │ Review ┐
//! │ body           │  form or pending table
//! └────────────────┘
//!  key hints
//! ```

mod app;
mod form;
mod input;
mod theme;

pub use app::{
    APPROVED_MESSAGE, App, Modal, ModalKind, NO_SELECTION_MESSAGE, SUBMITTED_MESSAGE, Tab,
};
pub use form::{FormFocus, SubmitForm};
pub use input::{handle_events, handle_key};
pub use theme::{Palette, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Tabs, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use signoff_engine::FIELD_COUNT;

const FIELD_LABELS: [&str; FIELD_COUNT] = ["Field 1", "Field 2", "Field 3", "Field 4"];
const INPUT_HEIGHT: u16 = 3;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let palette = Palette::standard();
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let [tabs_area, body_area, hints_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(frame.area());

    draw_tabs(frame, app, tabs_area, &palette);
    match app.tab() {
        Tab::Submit => draw_submit(frame, app, body_area, &palette),
        Tab::Review => draw_review(frame, app, body_area, &palette),
    }
    draw_hints(frame, app, hints_area, &palette);

    if let Some(modal) = app.modal() {
        draw_modal(frame, modal, &palette);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let titles = Tab::ALL.map(|tab| Line::from(format!(" {} ", tab.title())));
    let tabs = Tabs::new(titles)
        .select(app.tab().index())
        .style(Style::default().fg(palette.text_muted))
        .highlight_style(
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(styles::idle_border(palette))
                .title(" Signoff "),
        );
    frame.render_widget(tabs, area);
}

fn draw_submit(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let form = app.form();
    let mut constraints = vec![Constraint::Length(INPUT_HEIGHT); FIELD_COUNT + 1];
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(area);

    let client_focused = form.focus() == FormFocus::Client;
    let client_line = match form.selected_client() {
        Some(client) => Line::from(vec![
            Span::styled("◀ ", styles::key_hint(palette)),
            Span::styled(
                client.as_str(),
                Style::default().fg(palette.text_primary),
            ),
            Span::styled(" ▶", styles::key_hint(palette)),
        ]),
        None => Line::from(Span::styled(
            "◀ select a client ▶",
            Style::default().fg(palette.text_muted),
        )),
    };
    frame.render_widget(
        Paragraph::new(client_line).block(input_block("Client", client_focused, palette)),
        rows[0],
    );

    for (index, label) in FIELD_LABELS.iter().enumerate() {
        let focused = form.focus() == FormFocus::Field(index);
        let area = rows[index + 1];
        let value = form.field(index);
        frame.render_widget(
            Paragraph::new(Span::styled(
                value,
                Style::default().fg(palette.text_primary),
            ))
            .block(input_block(label, focused, palette)),
            area,
        );

        if focused && app.modal().is_none() {
            let inner_width = area.width.saturating_sub(2);
            let offset = u16::try_from(value.width()).unwrap_or(u16::MAX);
            let x = area.x + 1 + offset.min(inner_width.saturating_sub(1));
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

fn input_block<'a>(label: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    let border_style = if focused {
        styles::focused_border(palette)
    } else {
        styles::idle_border(palette)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(format!(" {label} "))
}

fn draw_review(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::idle_border(palette))
        .title(format!(" Pending ({}) ", app.pending().len()));

    if app.pending().is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No records awaiting approval",
            Style::default().fg(palette.text_muted),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        std::iter::once("Client")
            .chain(FIELD_LABELS)
            .map(|title| Cell::from(title).style(Style::default().fg(palette.accent))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .pending()
        .iter()
        .map(|record| {
            let mut cells = vec![Cell::from(record.client_id.to_string())];
            cells.extend(
                record
                    .fields
                    .as_array()
                    .map(|value| Cell::from(value.to_string())),
            );
            Row::new(cells).style(Style::default().fg(palette.text_secondary))
        })
        .collect();

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_row(palette))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, area, app.table_state_mut());
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let keys: &[(&str, &str)] = match app.tab() {
        Tab::Submit => &[
            ("Tab", " review  "),
            ("↑↓", " move  "),
            ("←→", " client  "),
            ("Enter", " submit  "),
            ("Esc", " quit"),
        ],
        Tab::Review => &[
            ("Tab", " submit  "),
            ("↑↓", " select  "),
            ("Enter/a", " approve  "),
            ("r", " refresh  "),
            ("Esc", " quit"),
        ],
    };
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, hint)| {
            [
                Span::styled(*key, styles::key_highlight(palette)),
                Span::styled(*hint, styles::key_hint(palette)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_modal(frame: &mut Frame, modal: &Modal, palette: &Palette) {
    let accent = match modal.kind {
        ModalKind::Info => palette.success,
        ModalKind::Warning => palette.warning,
        ModalKind::Error => palette.error,
    };

    let lines = vec![
        Line::from(Span::styled(
            modal.message.as_str(),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter/Esc", styles::key_highlight(palette)),
            Span::styled(" dismiss", styles::key_hint(palette)),
        ]),
    ];

    let area = frame.area();
    let content_width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(10);
    let content_width = u16::try_from(content_width)
        .unwrap_or(u16::MAX)
        .min(area.width.saturating_sub(8));
    let width = content_width.saturating_add(4).min(area.width);
    let height = 7u16.min(area.height);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            modal.kind.title(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        rect,
    );
}

#[cfg(test)]
pub(crate) fn test_app() -> App {
    use signoff_engine::{
        ClientDirectory, LogTransport, Notifier, RecordStore, WorkflowController,
    };

    let controller = WorkflowController::new(
        RecordStore::open_in_memory().expect("open store"),
        ClientDirectory::sample(),
        Notifier::new(LogTransport),
    );
    App::new(controller)
}
