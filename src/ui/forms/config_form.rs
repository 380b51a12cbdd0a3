//! Configuration form rendering

use super::field_renderer::{control_height, draw_control};
use crate::app::App;
use crate::platform::{LISTEN_SHORTCUT, SUBSCRIBE_SHORTCUT};
use crate::state::{FieldsStatus, FocusTarget, FormControl};
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the configuration form with action sidebar
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(40), // Action panel
        ])
        .split(area);

    draw_form(frame, main_chunks[0], app);
    draw_action_panel(frame, main_chunks[1], app);
}

/// Draw the form rows, scrolled so the focused row stays visible
fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let active = form.active_target();

    let block = Block::default()
        .title(" Configuration ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if active.is_button() {
            Color::DarkGray
        } else {
            Color::Cyan
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<(FocusTarget, FormControl)> = form
        .focus_targets()
        .into_iter()
        .filter_map(|target| form.control(target).map(|control| (target, control)))
        .collect();

    let heights: Vec<u16> = rows.iter().map(|(_, c)| control_height(c)).collect();
    // Buttons live in the action panel; keep the bottom of the form in view
    let focus_row = rows
        .iter()
        .position(|(target, _)| *target == active)
        .unwrap_or(rows.len().saturating_sub(1));
    let first = first_visible_row(&heights, focus_row, inner.height);

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for ((target, control), height) in rows.iter().zip(&heights).skip(first) {
        if y + height > bottom {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: *height,
        };
        draw_control(frame, row_area, control, *target == active);
        y += height;
    }

    // Loading / failure note below the rows when there is room
    let note = match app.state.fields_status {
        FieldsStatus::Loading => Some(("Fetching fields from server…", Color::Yellow)),
        FieldsStatus::Failed => Some(("Fields could not be loaded.", Color::Red)),
        FieldsStatus::Loaded if form.tree().is_empty() => {
            Some(("Server returned no configurable fields.", Color::DarkGray))
        }
        FieldsStatus::Loaded => None,
    };
    if let Some((text, color)) = note {
        if y < bottom {
            let note_area = Rect {
                x: inner.x + 1,
                y,
                width: inner.width.saturating_sub(1),
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(color))),
                note_area,
            );
        }
    }
}

/// Index of the first row to draw so that `focus` fits in `available` rows
fn first_visible_row(heights: &[u16], focus: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let focus = focus.min(heights.len() - 1);
    let mut first = focus;
    let mut used = heights[focus];
    while first > 0 && used + heights[first - 1] <= available {
        first -= 1;
        used += heights[first];
    }
    first
}

/// Draw the action panel sidebar
fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.state.form.active_target();
    let is_focused = active.is_button();

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Listen
            Constraint::Length(BUTTON_HEIGHT), // Generate subscribe URL
            Constraint::Min(0),                // Help text
        ])
        .split(inner_area);

    let listen_label = if app.state.listen_enabled {
        "Listen"
    } else {
        "Listening…"
    };
    render_action_button(
        frame,
        chunks[0],
        listen_label,
        LISTEN_SHORTCUT,
        active == FocusTarget::Listen,
        app.state.listen_enabled,
    );
    render_action_button(
        frame,
        chunks[1],
        "Generate subscribe URL",
        SUBSCRIBE_SHORTCUT,
        active == FocusTarget::Subscribe,
        true,
    );

    let help = Paragraph::new(vec![
        Line::from(Span::styled(
            "Listen plays the test text",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "with the current settings.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_when_everything_fits() {
        assert_eq!(first_visible_row(&[3, 4, 3], 2, 20), 0);
    }

    #[test]
    fn test_scrolls_to_keep_focus_visible() {
        // 5 rows of 4, room for 2
        assert_eq!(first_visible_row(&[4, 4, 4, 4, 4], 4, 8), 3);
        assert_eq!(first_visible_row(&[4, 4, 4, 4, 4], 1, 8), 0);
    }

    #[test]
    fn test_focus_taller_than_area() {
        assert_eq!(first_visible_row(&[4, 4, 4], 2, 2), 2);
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(first_visible_row(&[], 0, 10), 0);
    }
}
