//! UI rendering with Ratatui.

use crate::app::{App, AppState, InputMode};
use bwlens_core::Credential;
use chrono::{DateTime, FixedOffset, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    match app.state {
        AppState::Running => render_running(frame, app),
        AppState::Quit => {}
    }
}

fn render_running(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    // Credential list (75%) and diagnostic panel (25%)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(rows[0]);

    render_credentials(frame, app, columns[0]);
    render_status(frame, app, columns[1]);
    render_notification(frame, app, rows[1]);

    if app.input_mode == InputMode::PathEntry {
        render_path_overlay(frame, app, area);
    }
}

/// Render the credential table.
fn render_credentials(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.input_mode == InputMode::Normal;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(" 🔑 Credentials ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.session.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let message = Paragraph::new("Press o to open a BitWarden JSON export")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(50, 1, inner));
        return;
    }

    let header = Row::new(["Name", "Username", "Password", "Last updated"])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .session
        .credentials()
        .iter()
        .map(|credential| {
            let reused = app.config.highlight_reused && app.session.is_reused(credential);
            let password_color = if reused { Color::Red } else { Color::Yellow };
            Row::new([
                Cell::from(credential.name.as_str()).style(Style::default().fg(Color::White)),
                Cell::from(credential.username.as_deref().unwrap_or(""))
                    .style(Style::default().fg(Color::Green)),
                Cell::from(password_text(credential, app.masked, &app.config.mask))
                    .style(Style::default().fg(password_color)),
                Cell::from(format_timestamp(
                    credential.revised_at(),
                    &credential.revision_date,
                    &app.config.date_format,
                ))
                .style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(60, 60, 80))
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Render the counts, ordering and key help.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 📋 Export ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let file = app
        .export_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "none".to_string());

    let mut lines = vec![
        Line::from(format!("{} loaded.", app.session.len())),
        field_line("File", file, Color::White),
        field_line("Sorted by", app.order_label(), Color::Cyan),
        field_line(
            "Reused passwords",
            app.session.groups().reused_count().to_string(),
            Color::Red,
        ),
        field_line(
            "Passwords",
            if app.masked { "masked" } else { "visible" }.to_string(),
            Color::Yellow,
        ),
        Line::from(""),
    ];

    if let Some(credential) = app.selected() {
        lines.extend(selection_lines(app, credential));
        lines.push(Line::from(""));
    }

    for (key, action) in [
        ("o", "open export"),
        ("m", "mask/unmask"),
        ("n", "sort by name"),
        ("u", "sort by username"),
        ("p", "sort by password"),
        ("d", "sort by last updated"),
        ("r", "sort in reverse"),
        ("c", "check common passwords"),
        ("q", "quit"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:>2} "), Style::default().fg(Color::Magenta)),
            Span::styled(action, Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

/// Details of the selected credential that do not fit in the table.
fn selection_lines(app: &App, credential: &Credential) -> Vec<Line<'static>> {
    let shared_with = credential
        .usable_password()
        .and_then(|p| app.session.groups().get(p))
        .map_or(0, |members| members.len().saturating_sub(1));

    vec![
        field_line("Selected", credential.name.clone(), Color::White),
        field_line(
            "Created",
            format_timestamp(
                credential.created_at(),
                &credential.creation_date,
                &app.config.date_format,
            ),
            Color::White,
        ),
        field_line("URIs", credential.uris.len().to_string(), Color::Blue),
        field_line("Shared with", shared_with.to_string(), Color::Red),
    ]
}

fn field_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_notification(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref error) = app.error_message {
        let line = Paragraph::new(format!(" {error}"))
            .style(Style::default().fg(Color::White).bg(Color::Red));
        frame.render_widget(line, area);
    }
}

/// Render the path prompt overlay.
fn render_path_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_width = 70.min(area.width.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, 3, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 📂 Open export (Enter to load, Esc to cancel) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let input_line = Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Magenta)),
        Span::styled(app.path_input.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            "_",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);
    frame.render_widget(Paragraph::new(input_line).block(block), dialog_area);
}

/// Password cell text: the mask when hidden, otherwise the value or nothing.
pub fn password_text(credential: &Credential, masked: bool, mask: &str) -> String {
    if masked {
        mask.to_string()
    } else {
        credential.password.clone().unwrap_or_default()
    }
}

/// Format a parsed export timestamp in local time; unparseable values are shown as-is.
pub fn format_timestamp(parsed: Option<DateTime<FixedOffset>>, raw: &str, format: &str) -> String {
    match parsed {
        Some(timestamp) => timestamp.with_timezone(&Local).format(format).to_string(),
        None => raw.to_string(),
    }
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::backend::TestBackend;

    fn credential(password: Option<&str>) -> Credential {
        Credential {
            id: "1".into(),
            creation_date: "2024-06-15T12:00:00.000Z".into(),
            revision_date: "2024-06-15T12:00:00.000Z".into(),
            name: "Mail".into(),
            uris: vec![],
            username: Some("ann".into()),
            password: password.map(String::from),
        }
    }

    #[test]
    fn masked_password_uses_mask() {
        let c = credential(Some("hunter2"));
        assert_eq!(password_text(&c, true, "■■■■■■"), "■■■■■■");
        assert_eq!(password_text(&c, false, "■■■■■■"), "hunter2");
        assert_eq!(password_text(&credential(None), false, "***"), "");
    }

    #[test]
    fn formats_in_local_time() {
        let c = credential(None);
        let formatted = format_timestamp(c.revised_at(), &c.revision_date, "%m/%d/%y (%H:%M:%S)");
        assert_eq!(formatted.len(), "06/15/24 (12:00:00)".len());
        assert_eq!(format_timestamp(c.created_at(), &c.creation_date, "%Y"), "2024");
    }

    #[test]
    fn unparseable_timestamp_shown_verbatim() {
        assert_eq!(format_timestamp(None, "yesterday", "%Y"), "yesterday");
    }

    #[test]
    fn selection_shows_creation_date_and_sharing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(
            &path,
            r#"{ "encrypted": false, "folders": [], "items": [
                { "id": "1", "creationDate": "not a date", "revisionDate": "2024-01-01T00:00:00Z",
                  "name": "Mail", "favorite": false, "type": 1, "reprompt": 0,
                  "login": { "password": "hunter2", "uris": [{ "uri": "https://mail.example" }], "fido2Credentials": [] } },
                { "id": "2", "creationDate": "2023-01-01T00:00:00Z", "revisionDate": "2024-01-01T00:00:00Z",
                  "name": "Forum", "favorite": false, "type": 1, "reprompt": 0,
                  "login": { "password": "hunter2", "uris": [], "fido2Credentials": [] } }
            ] }"#,
        )
        .unwrap();
        let mut app = App::new(Config::default());
        assert!(app.load(path));

        let text: Vec<String> = selection_lines(&app, app.selected().unwrap())
            .iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(text[0], "Selected: Mail");
        assert_eq!(text[1], "Created: not a date");
        assert_eq!(text[2], "URIs: 1");
        assert_eq!(text[3], "Shared with: 1");
    }

    #[test]
    fn renders_empty_and_error_states() {
        let mut app = App::new(Config::default());
        app.error_message = Some("Error reading file.".to_string());

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("0 loaded."));
        assert!(text.contains("Error reading file."));
    }
}
