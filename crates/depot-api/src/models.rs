// Wire models for the depot REST API.
//
// Fields use `#[serde(default)]` where the server may omit them; its stats
// loader fills zeros for anything missing, and we mirror that.

use serde::{Deserialize, Serialize};

// ── Files ────────────────────────────────────────────────────────────

/// One stored file, as listed by `GET /api/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub filename: String,
    /// Raw size in bytes (not every server build sends it).
    #[serde(default)]
    pub size: Option<u64>,
    pub size_formatted: String,
    /// Unix seconds, fractional.
    pub upload_time: f64,
    #[serde(default)]
    pub download_count: u64,
}

/// Body of a successful `DELETE /api/delete/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

// ── Network statistics ───────────────────────────────────────────────

/// Aggregate transfer statistics from `GET /api/network_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub active_connections: u64,
    #[serde(default)]
    pub total_connections: u64,
    #[serde(default)]
    pub total_bytes_uploaded: u64,
    #[serde(default)]
    pub total_bytes_downloaded: u64,
    /// Bytes per second.
    #[serde(default)]
    pub upload_rate: f64,
    /// Bytes per second.
    #[serde(default)]
    pub download_rate: f64,
    #[serde(default)]
    pub connection_history: Vec<ConnectionRecord>,
}

/// Transfer summary for one historical or active client connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub ip_address: String,
    /// Unix seconds, fractional.
    #[serde(default)]
    pub connection_time: f64,
    #[serde(default)]
    pub bytes_uploaded: u64,
    #[serde(default)]
    pub bytes_downloaded: u64,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn network_stats_defaults_missing_fields() {
        let stats: NetworkStats = serde_json::from_value(json!({
            "active_connections": 2,
            "upload_rate": 12.5
        }))
        .unwrap();

        assert_eq!(stats.active_connections, 2);
        assert_eq!(stats.total_bytes_downloaded, 0);
        assert!((stats.upload_rate - 12.5).abs() < f64::EPSILON);
        assert!(stats.connection_history.is_empty());
    }

    #[test]
    fn file_record_accepts_fractional_upload_time() {
        let record: FileRecord = serde_json::from_value(json!({
            "filename": "a.txt",
            "size": 1536,
            "size_formatted": "1.5 KB",
            "upload_time": 1_700_000_000.25,
            "download_count": 3
        }))
        .unwrap();

        assert_eq!(record.size, Some(1536));
        assert_eq!(record.download_count, 3);
    }
}
