//! Banner stack rendered above the active screen, newest first.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use depot_core::Banner;

use crate::theme;

/// Most banners shown at once; older ones stay queued until dismissed or expired.
pub const MAX_VISIBLE: usize = 3;

/// Rows the stack needs for `count` banners.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn stack_height(count: usize) -> u16 {
    count.min(MAX_VISIBLE) as u16
}

pub fn render_banners(frame: &mut Frame, area: Rect, banners: &[Banner]) {
    let lines: Vec<Line> = banners
        .iter()
        .take(MAX_VISIBLE)
        .enumerate()
        .map(|(i, banner)| {
            let (color, icon) = theme::banner_accent(banner.level);
            let mut spans = vec![
                Span::styled(format!(" {icon} "), Style::default().fg(color)),
                Span::styled(banner.message.clone(), Style::default().fg(theme::DIM_WHITE)),
            ];
            if i == 0 {
                spans.push(Span::styled("  c ", theme::key_hint_key()));
                spans.push(Span::styled("dismiss", theme::key_hint()));
            }
            Line::from(spans).style(Style::default().bg(theme::BG_HIGHLIGHT))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_height_is_capped() {
        assert_eq!(stack_height(0), 0);
        assert_eq!(stack_height(2), 2);
        assert_eq!(stack_height(10), 3);
    }
}
