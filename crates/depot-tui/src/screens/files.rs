//! Files screen: hosted file listing with download, upload and two-step delete.

use std::path::PathBuf;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tracing::debug;

use depot_core::{ActionOutcome, FileManager, FileRow, Listing};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{popup, status_badge};

pub const EMPTY_TEXT: &str = "No files uploaded yet";

pub struct FilesScreen {
    focused: bool,
    manager: FileManager,
    table_state: TableState,
    throbber_state: ThrobberState,
    /// `Some` while the upload path prompt is open.
    upload_input: Option<String>,
}

impl FilesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            manager: FileManager::new(),
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
            upload_input: None,
        }
    }

    #[cfg(test)]
    pub fn manager(&self) -> &FileManager {
        &self.manager
    }

    fn rows(&self) -> &[FileRow] {
        self.manager.listing().rows()
    }

    fn selected_row(&self) -> Option<&FileRow> {
        self.table_state
            .selected()
            .and_then(|idx| self.rows().get(idx))
    }

    fn selected_filename(&self) -> Option<String> {
        self.selected_row().map(|row| row.filename.clone())
    }

    fn begin_load(&mut self) -> Action {
        Action::LoadFiles(self.manager.begin_load())
    }

    /// Keep the cursor inside the listing after it is replaced.
    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    #[allow(clippy::cast_sign_loss, clippy::as_conversions, clippy::cast_possible_wrap)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y' | 'Y') => self.manager.confirm_delete().map(Action::DeleteFile),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.manager.cancel_delete();
                None
            }
            _ => None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        let input = self.upload_input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.upload_input = None;
                None
            }
            KeyCode::Enter => {
                let path = input.trim().to_owned();
                self.upload_input = None;
                if path.is_empty() {
                    None
                } else {
                    Some(Action::UploadFile(PathBuf::from(path)))
                }
            }
            KeyCode::Backspace => {
                input.pop();
                None
            }
            KeyCode::Char(c) => {
                input.push(c);
                None
            }
            _ => None,
        }
    }

    fn render_listing(&self, frame: &mut Frame, area: Rect) {
        match self.manager.listing() {
            Listing::Loading => {
                let layout = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(area);
                let throbber = Throbber::default()
                    .label("  Loading files...")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
            }
            Listing::Idle | Listing::Empty => {
                let text = if matches!(self.manager.listing(), Listing::Empty) {
                    EMPTY_TEXT
                } else {
                    ""
                };
                let layout = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(area);
                frame.render_widget(
                    Paragraph::new(Span::styled(text, Style::default().fg(theme::BORDER_GRAY)))
                        .alignment(Alignment::Center),
                    layout[1],
                );
            }
            Listing::Populated(rows) => self.render_table(frame, area, rows),
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, rows: &[FileRow]) {
        let header = Row::new(vec![
            Cell::from("Filename"),
            Cell::from("Size"),
            Cell::from("Uploaded"),
            Cell::from("Downloads"),
        ])
        .style(theme::table_header());

        let selected = self.table_state.selected();
        let table_rows: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let name_style = Style::default().fg(theme::NEON_CYAN).add_modifier(
                    if selected == Some(i) {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    },
                );
                Row::new(vec![
                    Cell::from(row.filename.clone()).style(name_style),
                    Cell::from(row.size.clone()).style(Style::default().fg(theme::CORAL)),
                    Cell::from(row.uploaded.clone()),
                    Cell::from(Line::from(status_badge::download_count_span(
                        row.download_count,
                    ))),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Fill(3),
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(10),
        ];

        let table = Table::new(table_rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Default for FilesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FilesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.manager.pending_delete().is_some() {
            return Ok(self.handle_confirm_key(key));
        }
        if self.upload_input.is_some() {
            return Ok(self.handle_prompt_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.move_selection(isize::MIN / 2);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.move_selection(isize::MAX / 2);
                None
            }
            KeyCode::Char('r') => Some(Action::RefreshFiles),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(name) = self.selected_filename() {
                    self.manager.show_delete_confirmation(name);
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Enter => self.selected_filename().map(Action::DownloadFile),
            KeyCode::Char('u') => {
                self.upload_input = Some(String::new());
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Mount(ScreenId::Files)
            | Action::RefreshFiles
            | Action::FileActionDone(ActionOutcome::Completed) => {
                return Ok(Some(self.begin_load()));
            }
            Action::FilesLoaded { ticket, files } => {
                if self.manager.finish_load(*ticket, files.clone()) {
                    self.clamp_selection();
                } else {
                    debug!(ticket = ticket.get(), "ignored out-of-order file listing");
                }
            }
            Action::Tick => {
                if matches!(self.manager.listing(), Listing::Loading) {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

        let title = match self.manager.listing() {
            Listing::Populated(rows) => format!(" Files ({}) ", rows.len()),
            _ => " Files ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);
        self.render_listing(frame, inner);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("download  ", theme::key_hint()),
            Span::styled("u ", theme::key_hint_key()),
            Span::styled("upload  ", theme::key_hint()),
            Span::styled("x ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if let Some(name) = self.manager.pending_delete() {
            popup::render_confirm(
                frame,
                area,
                &format!("Are you sure you want to delete \"{name}\"?"),
            );
        } else if let Some(input) = &self.upload_input {
            popup::render_prompt(frame, area, "Upload file", input);
        }
    }

    fn captures_input(&self) -> bool {
        self.manager.pending_delete().is_some() || self.upload_input.is_some()
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Files"
    }
}
