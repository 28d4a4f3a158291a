//! Application core: event loop, screen management, action dispatch and
//! the background tasks that talk to the server.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use depot_core::{FileManager, NetworkMonitor, Poller, Session};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::banners;

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Components and background tasks dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    session: Session,
    /// Running only while the Network screen is active.
    poller: Option<Poller>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            session,
            poller: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        self.action_tx.send(Action::Mount(self.active_screen))?;
        self.sync_poller();
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.poller = None;
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Dialogs and prompts receive every key
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('c')) => return Ok(Some(Action::DismissBanner)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action: update app state, start I/O, or route it to a screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
                self.poller = None;
            }

            Action::Resize(w, h) => {
                debug!(width = w, height = h, "terminal resized");
            }

            Action::Render => {}

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                    self.action_tx.send(Action::Mount(*target))?;
                    self.sync_poller();
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::DismissBanner => {
                self.session.banners.dismiss_latest();
            }

            Action::Tick => {
                let expired = self.session.banners.expire(Instant::now());
                if expired > 0 {
                    debug!(expired, "banners expired");
                }
                self.route(action, Some(self.active_screen))?;
            }

            // ── Server I/O ────────────────────────────────────────
            Action::LoadFiles(ticket) => {
                let ticket = *ticket;
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let files = FileManager::fetch_files(&session.client, &session.banners).await;
                    let _ = tx.send(Action::FilesLoaded { ticket, files });
                });
            }

            Action::DeleteFile(filename) => {
                let filename = filename.clone();
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = FileManager::perform_delete(&session.client, &filename).await;
                    let outcome = FileManager::finish_delete(&session.banners, &filename, result);
                    let _ = tx.send(Action::FileActionDone(outcome));
                });
            }

            Action::DownloadFile(filename) => {
                let filename = filename.clone();
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = FileManager::perform_download(
                        &session.client,
                        &filename,
                        &session.config.download_dir,
                    )
                    .await;
                    let outcome =
                        FileManager::finish_download(&session.banners, &filename, result);
                    let _ = tx.send(Action::FileActionDone(outcome));
                });
            }

            Action::UploadFile(path) => {
                let path = path.clone();
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = FileManager::perform_upload(&session.client, &path).await;
                    let outcome = FileManager::finish_upload(&session.banners, result);
                    let _ = tx.send(Action::FileActionDone(outcome));
                });
            }

            Action::PollStats(ticket) => {
                let ticket = *ticket;
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let stats =
                        NetworkMonitor::fetch_stats(&session.client, &session.banners).await;
                    let _ = tx.send(Action::StatsLoaded { ticket, stats });
                });
            }

            // Results go to the screen that owns them, even if it is not active
            other => {
                let target = other.target_screen().or(Some(self.active_screen));
                self.route(other, target)?;
            }
        }

        Ok(())
    }

    fn route(&mut self, action: &Action, target: Option<ScreenId>) -> Result<()> {
        let Some(target) = target else {
            return Ok(());
        };
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Run the stats poller exactly while the Network screen is active.
    fn sync_poller(&mut self) {
        if self.running && self.active_screen == ScreenId::Network {
            if self.poller.is_none() {
                let tx = self.action_tx.clone();
                self.poller = Some(Poller::start(self.session.config.poll_interval, move || {
                    let tx = tx.clone();
                    async move {
                        let _ = tx.send(Action::RequestPoll);
                    }
                }));
            }
        } else {
            self.poller = None;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let current = self.session.banners.snapshot();

        let layout = Layout::vertical([
            Constraint::Length(banners::stack_height(current.len())),
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        banners::render_banners(frame, layout[0], &current);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let polling = if self.poller.as_ref().is_some_and(Poller::is_running) {
            Span::styled("● polling", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("○ idle", Style::default().fg(theme::BORDER_GRAY))
        };

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.session.config.server_url.to_string(),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::raw("  "),
            polling,
            Span::styled(" │ c dismiss  ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = crate::widgets::popup::centered_rect(52, 18, area);

        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(text, theme::key_hint()),
            ])
        };
        let heading =
            |text: &'static str| Line::from(Span::styled(text, Style::default().fg(theme::NEON_CYAN)));

        let help_text = vec![
            heading("  Global"),
            entry("1-2 Tab", "Switch screen"),
            entry("c", "Dismiss newest banner"),
            entry("?", "This help"),
            entry("q", "Quit"),
            Line::from(""),
            heading("  Files"),
            entry("j/k ↑/↓", "Move selection"),
            entry("d Enter", "Download selected file"),
            entry("u", "Upload a file by path"),
            entry("x Del", "Delete (asks to confirm)"),
            entry("r", "Reload listing"),
            Line::from(""),
            heading("  Network"),
            entry("r", "Poll now"),
            Line::from(""),
            Line::from(Span::styled("                 Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
