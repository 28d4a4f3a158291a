// ── Core error types ──
//
// User-facing errors from depot-core. Banners render these verbatim, so
// every message reads as a sentence fragment after "Failed to ...: ".
// The `From<depot_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Server errors ────────────────────────────────────────────────
    #[error("Server returned {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Server refused the upload (redirected to {landed})")]
    UploadRefused { landed: String },

    #[error("Invalid response from server: {message}")]
    InvalidResponse { message: String },

    // ── Client-side errors ───────────────────────────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Local file error: {message}")]
    LocalFile { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Request failed: {message}")]
    Api { message: String },
}

impl CoreError {
    /// HTTP status if the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<depot_api::Error> for CoreError {
    fn from(err: depot_api::Error) -> Self {
        match err {
            depot_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), url::Url::to_string),
                        reason: e.to_string(),
                    }
                } else if let Some(status) = e.status() {
                    CoreError::Rejected {
                        status: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or("Unknown").into(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            depot_api::Error::Status { status, reason } => CoreError::Rejected { status, reason },
            depot_api::Error::UploadRejected { landed } => CoreError::UploadRefused { landed },
            depot_api::Error::Deserialization { message, .. } => {
                CoreError::InvalidResponse { message }
            }
            depot_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            depot_api::Error::ClientBuild(message) => CoreError::Config { message },
            depot_api::Error::InvalidFilename(name) => CoreError::InvalidInput {
                message: format!("unusable filename {name:?}"),
            },
            depot_api::Error::Io(e) => CoreError::LocalFile {
                message: e.to_string(),
            },
        }
    }
}
