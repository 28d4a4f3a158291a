//! Page controllers and shared services between `depot-api` and the TUI.
//!
//! - **[`FileManager`]**: file listing lifecycle plus the two-step delete
//!   protocol, downloads and uploads.
//! - **[`NetworkMonitor`]**: summary cards, connection history and the
//!   rolling transfer chart rebuilt from each statistics poll.
//! - **[`BannerBoard`]**: shared stack of dismissible notifications; error
//!   banners expire after [`BANNER_TTL`].
//! - **[`fetch_data`]**: read wrapper that reports failures as banners and
//!   yields `None`.
//! - **[`Poller`]**: cancellable periodic task.
//!
//! Controllers never block on I/O themselves: each load is split into a
//! ticketed `begin_*` / `finish_*` pair so a UI loop can run the request on
//! a background task and drop responses that arrive out of order.

pub mod banner;
pub mod config;
pub mod error;
pub mod fetch;
pub mod files;
pub mod format;
pub mod network;
pub mod poller;
pub mod sequence;
pub mod session;

pub use banner::{BANNER_TTL, Banner, BannerBoard, BannerLevel};
pub use config::DashboardConfig;
pub use error::CoreError;
pub use fetch::fetch_data;
pub use files::{ActionOutcome, FileManager, FileRow, Listing};
pub use format::{format_bytes, format_date, format_file_size, format_rate, format_time_label};
pub use network::{
    CHART_CAPACITY, ChartSeries, ConnectionRow, ConnectionTable, NetworkMonitor, StatCards,
    TransferChart, initialize_chart, transfer_ratio,
};
pub use poller::Poller;
pub use sequence::{RequestSequencer, Ticket};
pub use session::Session;

pub use depot_api::{ConnectionRecord, FileRecord, NetworkStats};
