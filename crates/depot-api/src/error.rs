use thiserror::Error;

/// Top-level error type for the `depot-api` crate.
///
/// Covers every failure mode of the REST surface: transport, URL
/// construction, non-2xx responses, undecodable bodies, and local file I/O
/// for uploads and downloads. `depot-core` maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The upload redirect landed somewhere other than the file manager
    /// page, which is how the server signals a refused upload.
    #[error("Upload was not accepted (server redirected to {landed})")]
    UploadRejected { landed: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A filename that cannot be used as a single path segment.
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    // ── Local files ─────────────────────────────────────────────────
    /// Reading an upload or writing a download failed.
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code, when the failure came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never produced a response.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
