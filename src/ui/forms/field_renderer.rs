//! Row rendering utilities for the configuration form

use crate::state::{ControlKind, FormControl};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Columns of indentation per nesting level
const INDENT: u16 = 2;
/// Height of the bordered input box
pub const CONTROL_HEIGHT: u16 = 3;

/// Rows needed to draw `control`, including its description line
pub fn control_height(control: &FormControl) -> u16 {
    if control.description.is_empty() {
        CONTROL_HEIGHT
    } else {
        CONTROL_HEIGHT + 1
    }
}

/// Draw a form row: bordered value box plus optional description underneath
pub fn draw_control(frame: &mut Frame, area: Rect, control: &FormControl, is_active: bool) {
    let indent = (control.depth as u16 * INDENT).min(area.width.saturating_sub(10));
    let area = Rect {
        x: area.x + indent,
        width: area.width - indent,
        ..area
    };

    let accent = if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let box_area = Rect {
        height: CONTROL_HEIGHT.min(area.height),
        ..area
    };

    let content = match &control.kind {
        ControlKind::Select { .. } => {
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(control.display_value(), style))
        }
        ControlKind::Input => {
            let value = control.display_value();
            let (text, style) = if value.is_empty() && !is_active {
                ("(empty)".to_string(), Style::default().fg(Color::DarkGray))
            } else {
                (value, Style::default())
            };
            let cursor = if is_active { "▌" } else { "" };
            Line::from(vec![
                Span::styled(text, style),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ])
        }
    };

    let block = Block::default()
        .title(format!(" {} ", control.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    frame.render_widget(Paragraph::new(content).block(block), box_area);

    if !control.description.is_empty() && area.height > CONTROL_HEIGHT {
        let desc_area = Rect {
            x: area.x + 1,
            y: area.y + CONTROL_HEIGHT,
            width: area.width.saturating_sub(1),
            height: 1,
        };
        let desc = Paragraph::new(Span::styled(
            control.description.as_str(),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(desc, desc_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(control: &FormControl, is_active: bool) -> String {
        let backend = TestBackend::new(40, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_control(frame, frame.area(), control, is_active))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_height_accounts_for_description() {
        let bare = FormControl::input("A", "", "");
        let described = FormControl::input("A", "", "help");
        assert_eq!(control_height(&bare), 3);
        assert_eq!(control_height(&described), 4);
    }

    #[test]
    fn test_renders_label_value_and_description() {
        let control = FormControl::input("Token", "abc", "can be empty");
        let screen = render(&control, true);
        assert!(screen.contains(" Token "));
        assert!(screen.contains("abc▌"));
        assert!(screen.contains("can be empty"));
    }

    #[test]
    fn test_inactive_empty_input_shows_placeholder() {
        let control = FormControl::input("Token", "", "");
        assert!(render(&control, false).contains("(empty)"));
    }

    #[test]
    fn test_select_renders_arrows() {
        let control = FormControl::select("model", vec!["Edge".to_string()], "Edge", "");
        assert!(render(&control, false).contains("◀ Edge ▶"));
    }
}
