//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::path::PathBuf;

use depot_core::{ActionOutcome, FileRecord, NetworkStats, Ticket};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    /// Sent to a screen when it becomes active.
    Mount(ScreenId),
    ToggleHelp,

    // ── Banners ───────────────────────────────────────────────────
    DismissBanner,

    // ── File manager ──────────────────────────────────────────────
    RefreshFiles,
    LoadFiles(Ticket),
    FilesLoaded {
        ticket: Ticket,
        files: Option<Vec<FileRecord>>,
    },
    DeleteFile(String),
    DownloadFile(String),
    UploadFile(PathBuf),
    FileActionDone(ActionOutcome),

    // ── Network statistics ────────────────────────────────────────
    RequestPoll,
    PollStats(Ticket),
    StatsLoaded {
        ticket: Ticket,
        stats: Option<NetworkStats>,
    },
}

impl Action {
    /// Screen that owns this action's state, regardless of which one is active.
    pub fn target_screen(&self) -> Option<ScreenId> {
        match self {
            Self::Mount(id) => Some(*id),
            Self::RefreshFiles | Self::FilesLoaded { .. } | Self::FileActionDone(_) => {
                Some(ScreenId::Files)
            }
            Self::RequestPoll | Self::StatsLoaded { .. } => Some(ScreenId::Network),
            _ => None,
        }
    }
}
