// ── Shared per-run services ──

use depot_api::DepotClient;
use tracing::info;

use crate::banner::BannerBoard;
use crate::config::DashboardConfig;
use crate::error::CoreError;

/// The HTTP client, banner board and configuration shared by every screen.
///
/// Cheap to clone: the client and board are reference-counted internally.
#[derive(Debug, Clone)]
pub struct Session {
    pub client: DepotClient,
    pub banners: BannerBoard,
    pub config: DashboardConfig,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = DepotClient::new(config.server_url.clone(), &config.transport())?;
        info!(server = %config.server_url, "session ready");
        Ok(Self {
            client,
            banners: BannerBoard::new(),
            config,
        })
    }

    /// Wrap an existing client, e.g. one pointed at a mock server.
    pub fn with_client(client: DepotClient, config: DashboardConfig) -> Self {
        Self {
            client,
            banners: BannerBoard::new(),
            config,
        }
    }
}
