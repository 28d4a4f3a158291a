//! Network screen: summary cards, transfer chart and connection history.

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
    TableState,
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tracing::debug;

use depot_core::network::NO_HISTORY_TEXT;
use depot_core::{ConnectionTable, NetworkMonitor, format_file_size};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::status_badge;

pub struct NetworkScreen {
    focused: bool,
    monitor: NetworkMonitor,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl NetworkScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            monitor: NetworkMonitor::new(),
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    #[cfg(test)]
    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    fn begin_poll(&mut self) -> Action {
        Action::PollStats(self.monitor.begin_poll())
    }

    #[allow(clippy::cast_sign_loss, clippy::as_conversions, clippy::cast_possible_wrap)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.monitor.table().rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn panel(title: String) -> Block<'static> {
        Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
    }

    fn render_card(frame: &mut Frame, area: Rect, title: &str, value: &str, detail: &str, color: Color) {
        let block = Self::panel(format!(" {title} "));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = vec![
            Line::from(Span::styled(value.to_owned(), theme::card_value(color))),
            Line::from(Span::styled(detail.to_owned(), theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        let Some(cards) = self.monitor.cards() else {
            let throbber = Throbber::default()
                .label("  Waiting for statistics...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            let block = Self::panel(" Summary ".to_owned());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_stateful_widget(throbber, inner, &mut self.throbber_state.clone());
            return;
        };

        Self::render_card(
            frame,
            columns[0],
            "Active Connections",
            &cards.active_connections,
            &cards.total_connections,
            theme::SUCCESS_GREEN,
        );
        Self::render_card(
            frame,
            columns[1],
            "Uploaded",
            &cards.uploaded,
            &cards.upload_rate,
            theme::UPLOAD_COLOR,
        );
        Self::render_card(
            frame,
            columns[2],
            "Downloaded",
            &cards.downloaded,
            &cards.download_rate,
            theme::DOWNLOAD_COLOR,
        );
        Self::render_card(
            frame,
            columns[3],
            "Up/Down Ratio",
            &cards.ratio,
            &cards.total_transferred,
            theme::ELECTRIC_YELLOW,
        );
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let chart = self.monitor.chart();
        let title = match self.monitor.last_updated() {
            Some(at) => format!(" Transfer History · updated {} ", at.format("%H:%M:%S")),
            None => " Transfer History ".to_owned(),
        };
        let block = Self::panel(title);

        let series = chart.series();
        if series.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No samples yet").style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let uploaded = series.uploaded_points();
        let downloaded = series.downloaded_points();

        let upload_line = Dataset::default()
            .name(chart.upload_label)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::UPLOAD_COLOR))
            .data(&uploaded);

        let download_line = Dataset::default()
            .name(chart.download_label)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::DOWNLOAD_COLOR))
            .data(&downloaded);

        let labels: Vec<&str> = series.labels().collect();
        let x_labels: Vec<Span> = labels
            .first()
            .zip(labels.last())
            .map(|(first, last)| {
                vec![
                    Span::styled(*first, Style::default().fg(theme::BORDER_GRAY)),
                    Span::styled(*last, Style::default().fg(theme::BORDER_GRAY)),
                ]
            })
            .unwrap_or_default();

        let [_, y_max] = chart.y_bounds();
        let y_labels = vec![
            Span::styled("0", Style::default().fg(theme::BORDER_GRAY)),
            Span::styled(
                format_file_size(y_max / 2.0),
                Style::default().fg(theme::BORDER_GRAY),
            ),
            Span::styled(format_file_size(y_max), Style::default().fg(theme::BORDER_GRAY)),
        ];

        let widget = Chart::new(vec![upload_line, download_line])
            .block(block)
            .x_axis(
                Axis::default()
                    .title(chart.x_title)
                    .bounds(chart.x_bounds())
                    .labels(x_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .title(chart.y_title)
                    .bounds(chart.y_bounds())
                    .labels(y_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );

        frame.render_widget(widget, area);
    }

    fn render_connections(&self, frame: &mut Frame, area: Rect) {
        let table = self.monitor.table();
        let title = match table {
            ConnectionTable::Rows(rows) => format!(" Connection History ({}) ", rows.len()),
            ConnectionTable::NoHistory => " Connection History ".to_owned(),
        };
        let block = Self::panel(title).border_style(if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(vec![
            Cell::from("Client"),
            Cell::from("IP Address"),
            Cell::from("Connected"),
            Cell::from("Uploaded"),
            Cell::from("Downloaded"),
            Cell::from("Status"),
        ])
        .style(theme::table_header());

        let widths = [
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Length(20),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(15),
        ];

        if matches!(table, ConnectionTable::NoHistory) {
            let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);
            frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), layout[0]);
            frame.render_widget(
                Paragraph::new(Span::styled(NO_HISTORY_TEXT, Style::default().fg(theme::BORDER_GRAY)))
                    .alignment(Alignment::Center),
                layout[1],
            );
            return;
        }

        let rows: Vec<Row> = table
            .rows()
            .iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.client_id.clone()).style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(row.ip_address.clone()).style(Style::default().fg(theme::CORAL)),
                    Cell::from(row.connected_at.clone()),
                    Cell::from(row.uploaded.clone()).style(Style::default().fg(theme::UPLOAD_COLOR)),
                    Cell::from(row.downloaded.clone())
                        .style(Style::default().fg(theme::DOWNLOAD_COLOR)),
                    Cell::from(Line::from(status_badge::connection_span(
                        row.active,
                        row.status_label(),
                    ))),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widget = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(widget, inner, &mut state);
    }
}

impl Default for NetworkScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NetworkScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('r') => Some(Action::RequestPoll),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // The app's poller fires its first tick on mount, so no poll here.
            Action::Mount(ScreenId::Network) => {
                self.monitor.reset();
                self.table_state = TableState::default();
            }
            Action::RequestPoll => return Ok(Some(self.begin_poll())),
            Action::StatsLoaded { ticket, stats } => {
                if self
                    .monitor
                    .finish_poll(*ticket, stats.clone(), Local::now())
                {
                    let len = self.monitor.table().rows().len();
                    if let Some(idx) = self.table_state.selected() {
                        if idx >= len {
                            self.table_state.select(len.checked_sub(1));
                        }
                    }
                } else {
                    debug!(ticket = ticket.get(), "network stats not applied");
                }
            }
            Action::Tick => {
                if self.monitor.cards().is_none() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_cards(frame, layout[0]);
        self.render_chart(frame, layout[1]);
        self.render_connections(frame, layout[2]);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("scroll  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh now", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Network"
    }
}
