//! Shared rendering helpers used across screens.

pub mod text_field;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// A row of `key label` hints, e.g. `[("a", "add"), ("q", "quit")]`.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled((*key).to_owned(), theme::key_hint_key()));
        spans.push(Span::styled(format!(" {label}  "), theme::key_hint()));
    }
    Line::from(spans)
}

/// The error and success notices of a screen, at most one line each.
pub fn banners(error: Option<&str>, success: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(msg) = error {
        lines.push(Line::from(Span::styled(format!(" ✗ {msg}"), theme::error_banner())));
    }
    if let Some(msg) = success {
        lines.push(Line::from(Span::styled(
            format!(" ✓ {msg}"),
            theme::success_banner(),
        )));
    }
    lines
}

/// A labelled spinner for in-flight requests.
pub fn throbber(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let throbber = Throbber::default()
        .label(format!(" {label}"))
        .style(Style::default().fg(theme::NEON_CYAN))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}

/// A centered rectangle of at most `width` × `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// A y/n confirmation dialog over the middle of `area`.
pub fn confirm_dialog(frame: &mut Frame, area: Rect, message: &str) {
    let dialog_area = centered(area, 56, 6);
    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        dialog_area,
    );

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}
