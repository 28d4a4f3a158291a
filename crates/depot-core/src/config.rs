// ── Runtime configuration consumed by the controllers ──
//
// Already validated; `depot-config` handles loading and merging.

use std::path::PathBuf;
use std::time::Duration;

use depot_api::TransportConfig;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Server root, e.g. `http://127.0.0.1:5000`.
    pub server_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Network statistics refresh period.
    pub poll_interval: Duration,
    /// Where downloads are written.
    pub download_dir: PathBuf,
}

impl DashboardConfig {
    /// Defaults for everything but the server address.
    pub fn new(server_url: Url) -> Self {
        Self {
            server_url,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            download_dir: PathBuf::from("downloads"),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}
