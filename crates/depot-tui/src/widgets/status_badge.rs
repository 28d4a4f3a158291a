//! Small inline badges: connection status and download counts.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::theme;

/// `● Active` in green or `○ Disconnected` in gray.
pub fn connection_span(active: bool, label: &'static str) -> Span<'static> {
    if active {
        Span::styled(
            format!("● {label}"),
            Style::default()
                .fg(theme::SUCCESS_GREEN)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("○ {label}"), Style::default().fg(theme::BORDER_GRAY))
    }
}

/// Download counter; never-downloaded files are dimmed.
pub fn download_count_span(count: u64) -> Span<'static> {
    let color = if count == 0 {
        theme::BORDER_GRAY
    } else {
        theme::NEON_CYAN
    };
    Span::styled(format!("↓ {count}"), Style::default().fg(color))
}
