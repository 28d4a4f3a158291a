// ── Network statistics controller ──
//
// Summary cards, connection history and a rolling two-series transfer
// chart, all rebuilt from each `/api/network_stats` poll.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use depot_api::{ConnectionRecord, DepotClient, NetworkStats};
use tracing::debug;

use crate::banner::BannerBoard;
use crate::fetch::fetch_data;
use crate::format::{format_bytes, format_date, format_rate, format_time_label};
use crate::sequence::{RequestSequencer, Ticket};

/// Maximum number of buffered chart samples.
pub const CHART_CAPACITY: usize = 20;

pub const UPLOAD_SERIES: &str = "Uploads";
pub const DOWNLOAD_SERIES: &str = "Downloads";
pub const NO_HISTORY_TEXT: &str = "No connection history available";

// ── Chart ────────────────────────────────────────────────────────────

/// Three parallel sample buffers, evicted together.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    labels: VecDeque<String>,
    uploaded: VecDeque<u64>,
    downloaded: VecDeque<u64>,
}

impl ChartSeries {
    /// Append one sample, dropping the oldest once more than [`CHART_CAPACITY`] are held.
    pub fn push(&mut self, label: String, uploaded: u64, downloaded: u64) {
        self.labels.push_back(label);
        self.uploaded.push_back(uploaded);
        self.downloaded.push_back(downloaded);
        while self.labels.len() > CHART_CAPACITY {
            self.labels.pop_front();
            self.uploaded.pop_front();
            self.downloaded.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn uploaded(&self) -> impl Iterator<Item = u64> + '_ {
        self.uploaded.iter().copied()
    }

    pub fn downloaded(&self) -> impl Iterator<Item = u64> + '_ {
        self.downloaded.iter().copied()
    }

    /// `(sample index, bytes)` pairs for plotting the upload series.
    pub fn uploaded_points(&self) -> Vec<(f64, f64)> {
        to_points(&self.uploaded)
    }

    pub fn downloaded_points(&self) -> Vec<(f64, f64)> {
        to_points(&self.downloaded)
    }

    /// Largest value across both series (0 when empty).
    pub fn max_value(&self) -> u64 {
        self.uploaded
            .iter()
            .chain(self.downloaded.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_points(values: &VecDeque<u64>) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v as f64))
        .collect()
}

/// Time-series chart of cumulative upload/download totals.
#[derive(Debug, Clone)]
pub struct TransferChart {
    pub upload_label: &'static str,
    pub download_label: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    series: ChartSeries,
}

impl TransferChart {
    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    /// X range over the buffered sample indices.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.series.len().saturating_sub(1).max(1);
        [0.0, last as f64]
    }

    /// Y range from zero with a little headroom above the largest sample.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn y_bounds(&self) -> [f64; 2] {
        let top = self.series.max_value().max(1) as f64;
        [0.0, top * 1.1]
    }
}

/// Chart with two empty series (Uploads, Downloads) and y starting at zero.
pub fn initialize_chart() -> TransferChart {
    TransferChart {
        upload_label: UPLOAD_SERIES,
        download_label: DOWNLOAD_SERIES,
        x_title: "Time",
        y_title: "Data (bytes)",
        series: ChartSeries::default(),
    }
}

// ── Stat cards ───────────────────────────────────────────────────────

/// Uploaded/downloaded ratio to two decimals, or "N/A" when nothing was downloaded.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn transfer_ratio(uploaded: u64, downloaded: u64) -> String {
    if downloaded == 0 {
        return "N/A".to_owned();
    }
    format!("{:.2}", uploaded as f64 / downloaded as f64)
}

/// Preformatted text for the summary cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCards {
    pub active_connections: String,
    pub total_connections: String,
    pub uploaded: String,
    pub upload_rate: String,
    pub downloaded: String,
    pub download_rate: String,
    pub ratio: String,
    pub total_transferred: String,
}

impl From<&NetworkStats> for StatCards {
    fn from(stats: &NetworkStats) -> Self {
        let up = stats.total_bytes_uploaded;
        let down = stats.total_bytes_downloaded;
        Self {
            active_connections: stats.active_connections.to_string(),
            total_connections: format!("Total: {}", stats.total_connections),
            uploaded: format_bytes(up),
            upload_rate: format!("Rate: {}", format_rate(stats.upload_rate)),
            downloaded: format_bytes(down),
            download_rate: format!("Rate: {}", format_rate(stats.download_rate)),
            ratio: transfer_ratio(up, down),
            total_transferred: format!("Total: {}", format_bytes(up.saturating_add(down))),
        }
    }
}

// ── Connection table ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRow {
    pub client_id: String,
    pub ip_address: String,
    pub connection_time: f64,
    pub connected_at: String,
    pub uploaded: String,
    pub downloaded: String,
    pub active: bool,
}

impl ConnectionRow {
    pub fn status_label(&self) -> &'static str {
        if self.active { "Active" } else { "Disconnected" }
    }
}

impl From<&ConnectionRecord> for ConnectionRow {
    fn from(record: &ConnectionRecord) -> Self {
        let short: String = record.client_id.chars().take(8).collect();
        Self {
            client_id: format!("{short}..."),
            ip_address: record.ip_address.clone(),
            connection_time: record.connection_time,
            connected_at: format_date(record.connection_time),
            uploaded: format_bytes(record.bytes_uploaded),
            downloaded: format_bytes(record.bytes_downloaded),
            active: record.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConnectionTable {
    /// Renders a single [`NO_HISTORY_TEXT`] row.
    #[default]
    NoHistory,
    /// Newest connection first.
    Rows(Vec<ConnectionRow>),
}

impl ConnectionTable {
    /// Sort `history` newest-first and build the rows. Re-sorts fully on every call.
    pub fn build(history: &[ConnectionRecord]) -> Self {
        if history.is_empty() {
            return Self::NoHistory;
        }
        let mut sorted: Vec<&ConnectionRecord> = history.iter().collect();
        sorted.sort_by(|a, b| b.connection_time.total_cmp(&a.connection_time));
        Self::Rows(sorted.into_iter().map(ConnectionRow::from).collect())
    }

    pub fn rows(&self) -> &[ConnectionRow] {
        match self {
            Self::Rows(rows) => rows,
            Self::NoHistory => &[],
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Page controller for the network dashboard. Reset on every mount.
#[derive(Debug)]
pub struct NetworkMonitor {
    cards: Option<StatCards>,
    table: ConnectionTable,
    chart: TransferChart,
    sequencer: RequestSequencer,
    last_updated: Option<DateTime<Local>>,
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkMonitor {
    pub fn new() -> Self {
        Self {
            cards: None,
            table: ConnectionTable::NoHistory,
            chart: initialize_chart(),
            sequencer: RequestSequencer::new(),
            last_updated: None,
        }
    }

    /// Start over with an empty display, as on a fresh mount. Polls issued
    /// before the reset are discarded when they land.
    pub fn reset(&mut self) {
        let mut sequencer = std::mem::take(&mut self.sequencer);
        sequencer.invalidate();
        *self = Self {
            sequencer,
            ..Self::new()
        };
    }

    /// `None` until the first successful poll.
    pub fn cards(&self) -> Option<&StatCards> {
        self.cards.as_ref()
    }

    pub fn table(&self) -> &ConnectionTable {
        &self.table
    }

    pub fn chart(&self) -> &TransferChart {
        &self.chart
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn is_loading(&self) -> bool {
        self.sequencer.is_pending()
    }

    pub fn update_stat_cards(&mut self, stats: &NetworkStats) {
        self.cards = Some(StatCards::from(stats));
    }

    pub fn update_connection_table(&mut self, history: &[ConnectionRecord]) {
        self.table = ConnectionTable::build(history);
    }

    /// Append the current totals as one sample labeled with `now`.
    pub fn update_chart(&mut self, stats: &NetworkStats, now: DateTime<Local>) {
        self.chart.series.push(
            format_time_label(&now),
            stats.total_bytes_uploaded,
            stats.total_bytes_downloaded,
        );
    }

    pub fn begin_poll(&mut self) -> Ticket {
        self.sequencer.issue()
    }

    /// Apply one poll result. `None` keeps the stale display, and a result
    /// older than one already settled is dropped. Returns whether anything changed.
    pub fn finish_poll(
        &mut self,
        ticket: Ticket,
        stats: Option<NetworkStats>,
        now: DateTime<Local>,
    ) -> bool {
        if !self.sequencer.accept(ticket) {
            debug!(ticket = ticket.get(), "dropping stale network stats");
            return false;
        }
        let Some(stats) = stats else {
            return false;
        };
        self.update_stat_cards(&stats);
        self.update_connection_table(&stats.connection_history);
        self.update_chart(&stats, now);
        self.last_updated = Some(now);
        true
    }

    /// `GET /api/network_stats`, downgraded to `None` (with a banner) on failure.
    pub async fn fetch_stats(client: &DepotClient, banners: &BannerBoard) -> Option<NetworkStats> {
        fetch_data(banners, client.network_stats()).await
    }

    /// Fetch and apply one round of statistics.
    pub async fn load_network_stats(&mut self, client: &DepotClient, banners: &BannerBoard) -> bool {
        let ticket = self.begin_poll();
        let stats = Self::fetch_stats(client, banners).await;
        self.finish_poll(ticket, stats, Local::now())
    }
}
