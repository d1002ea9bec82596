//! Single-line text entry on top of `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Translate an editing key into a `tui-input` request. Keys that are not
/// line-editing keys yield `None` and stay with the caller.
pub fn request_for(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Apply `key` to `input`. Returns `true` when the value changed.
pub fn edit(input: &mut Input, key: KeyEvent) -> bool {
    let Some(request) = request_for(key) else {
        return false;
    };
    input.handle(request).is_some_and(|changed| changed.value)
}

/// Render `label: value` and place the terminal cursor when `focused`.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    placeholder: &str,
) {
    let label_text = format!(" {label:<14}");
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let label_width = label_text.chars().count() as u16;
    let field_width = usize::from(area.width.saturating_sub(label_width + 1));
    let scroll = input.visual_scroll(field_width);

    let label_style = if focused {
        theme::title_style()
    } else {
        theme::key_hint()
    };
    let value = if input.value().is_empty() && !focused {
        Span::styled(placeholder.to_owned(), theme::key_hint())
    } else {
        let shown: String = input.value().chars().skip(scroll).collect();
        Span::styled(shown, Style::default().fg(theme::DIM_WHITE))
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(label_text, label_style), value])),
        area,
    );

    if focused {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let offset = input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position(Position::new(area.x + label_width + offset, area.y));
    }
}
