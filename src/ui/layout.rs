//! Layout components (header, body, status bar)

use crate::app::App;
use crate::platform::{LISTEN_SHORTCUT, SUBSCRIBE_SHORTCUT};
use crate::state::{FieldsStatus, FocusTarget};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split the screen into header, body and the status bar line
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the title header with the server address
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let (status, color) = match app.state.fields_status {
        FieldsStatus::Loading => ("loading fields…", Color::Yellow),
        FieldsStatus::Loaded => ("connected", Color::Green),
        FieldsStatus::Failed => ("fields unavailable", Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(
            "TTS Model Server",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(&app.state.server_address, Style::default().fg(Color::Blue)),
        Span::raw("  "),
        Span::styled(status, Style::default().fg(color)),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Listen availability
    let listen_status = if app.state.listen_enabled {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    };
    spans.push(listen_status);

    let hints = get_focus_hints(app.state.form.active_target(), app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    // Feedback message
    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the focused row
fn get_focus_hints(target: FocusTarget, app: &App) -> String {
    let shortcuts = format!("{LISTEN_SHORTCUT}:listen  {SUBSCRIBE_SHORTCUT}:copy URL");
    match target {
        FocusTarget::Field(id)
            if app
                .state
                .form
                .tree()
                .get(id)
                .is_some_and(|w| w.field.has_options()) =>
        {
            format!("Tab:next  ←/→:choose  {shortcuts}")
        }
        FocusTarget::Listen | FocusTarget::Subscribe => {
            format!("Tab:next  Enter:press  {shortcuts}")
        }
        _ => format!("Tab:next  type to edit  {shortcuts}"),
    }
}
