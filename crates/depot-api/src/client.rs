// HTTP client for the depot REST API.
//
// Wraps `reqwest::Client` with endpoint URL construction, status checking,
// and JSON decoding. Every method returns the decoded payload or a typed
// `Error`; swallowing failures is left to the callers in `depot-core`.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::models::{DeleteResponse, FileRecord, NetworkStats};
use crate::transport::TransportConfig;

/// Async client for the file-hosting server.
///
/// `base_url` is the server root (e.g. `http://127.0.0.1:5000`); a path
/// prefix is kept, so a server mounted under `/depot/` works too.
#[derive(Debug, Clone)]
pub struct DepotClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DepotClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own `reqwest::Client` from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self { http, base_url })
    }

    /// Parse `base_url` and wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Self::with_client(http, Url::parse(base_url)?)
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_client` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of the raw download for `filename`.
    pub fn download_url(&self, filename: &str) -> Result<Url, Error> {
        let name = checked_filename(filename)?;
        Ok(self.endpoint(&["download", name]))
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp)?;
        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            })
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Files ────────────────────────────────────────────────────────

    /// `GET /api/files`
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, Error> {
        let url = self.endpoint(&["api", "files"]);
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    /// `DELETE /api/delete/{filename}`
    pub async fn delete_file(&self, filename: &str) -> Result<DeleteResponse, Error> {
        let name = checked_filename(filename)?;
        let url = self.endpoint(&["api", "delete", name]);
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        Self::handle_response(resp).await
    }

    /// `GET /download/{filename}`, streamed into `dir/{filename}`.
    ///
    /// Only the final path component of `filename` is used locally, so a
    /// server-supplied name can never escape `dir`. The body goes to a
    /// sibling `.part` file that replaces the target only once fully
    /// written; on failure the target is left as it was. Returns the
    /// written path.
    pub async fn download_file(&self, filename: &str, dir: &Path) -> Result<PathBuf, Error> {
        let local_name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::InvalidFilename(filename.to_owned()))?;
        let url = self.download_url(filename)?;
        debug!("GET {url}");

        let resp = Self::check_status(self.http.get(url).send().await?)?;

        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(local_name);
        let mut part_name = local_name.to_os_string();
        part_name.push(".part");
        let partial = dir.join(part_name);

        let written = match stream_to_file(resp, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    warn!(path = %partial.display(), error = %cleanup, "could not remove partial download");
                }
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, &target).await?;
        debug!(path = %target.display(), bytes = written, "download complete");
        Ok(target)
    }

    /// `POST /upload` as multipart form field `file`.
    ///
    /// The server answers every upload with a redirect: to the file manager
    /// page when the file was stored, back to `/upload` when it was refused.
    /// reqwest follows it, so the final URL decides the outcome.
    ///
    /// Returns the name the server stores the file under, or `None` when
    /// that name cannot be derived locally (see [`stored_filename`]).
    pub async fn upload_file(&self, path: &Path) -> Result<Option<String>, Error> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFilename(path.display().to_string()))?
            .to_owned();
        let bytes = tokio::fs::read(path).await?;
        let size = bytes.len();

        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.clone()));
        let url = self.endpoint(&["upload"]);
        debug!("POST {url} ({size} bytes)");

        let resp = Self::check_status(self.http.post(url).multipart(form).send().await?)?;
        let landed = resp.url().path();
        if !landed.trim_end_matches('/').ends_with("/file_manager") {
            return Err(Error::UploadRejected {
                landed: landed.to_owned(),
            });
        }
        Ok(stored_filename(&filename))
    }

    // ── Network statistics ───────────────────────────────────────────

    /// `GET /api/network_stats`
    pub async fn network_stats(&self) -> Result<NetworkStats, Error> {
        let url = self.endpoint(&["api", "network_stats"]);
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }
}

/// First 200 characters of a body, for error messages.
fn body_preview(body: &str) -> &str {
    body.char_indices().nth(200).map_or(body, |(idx, _)| &body[..idx])
}

/// Write a response body to `path`, returning the byte count.
async fn stream_to_file(mut resp: reqwest::Response, path: &Path) -> Result<u64, Error> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
    }
    file.flush().await?;
    Ok(written)
}

/// The name the server saves an upload under.
///
/// The server sanitizes names by folding whitespace runs into `_`, dropping
/// anything outside `[A-Za-z0-9_.-]` and trimming leading/trailing `.` and
/// `_`. Non-ASCII input goes through Unicode compatibility decomposition
/// first, which is not reproduced here, so such names yield `None`, as do
/// names that sanitize to nothing.
pub fn stored_filename(filename: &str) -> Option<String> {
    if !filename.is_ascii() {
        return None;
    }
    let joined = filename
        .replace(['/', '\\'], " ")
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(['.', '_']);
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn checked_filename(filename: &str) -> Result<&str, Error> {
    if filename.is_empty() || filename == "." || filename == ".." {
        Err(Error::InvalidFilename(filename.to_owned()))
    } else {
        Ok(filename)
    }
}
