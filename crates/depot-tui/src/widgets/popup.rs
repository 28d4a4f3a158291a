//! Centered overlays: the delete confirmation and the upload path prompt.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::theme;

/// A `width` × `height` rectangle centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn dialog_frame(frame: &mut Frame, area: Rect, title: &str, border: Style) -> Rect {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_DARK)), area);

    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Yes/no dialog. `y` confirms, `n` or `Esc` cancels.
pub fn render_confirm(frame: &mut Frame, area: Rect, message: &str) {
    let dialog_area = centered_rect(56, 6, area);
    let inner = dialog_frame(
        frame,
        dialog_area,
        "Confirm",
        Style::default().fg(theme::ELECTRIC_YELLOW),
    );

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

/// Single-line text prompt with a block cursor.
pub fn render_prompt(frame: &mut Frame, area: Rect, title: &str, input: &str) {
    let dialog_area = centered_rect(64, 5, area);
    let inner = dialog_frame(frame, dialog_area, title, theme::border_focused());

    let text = vec![
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(theme::ELECTRIC_PURPLE)),
            Span::styled(input, Style::default().fg(theme::NEON_CYAN)),
            Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("upload    ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}
