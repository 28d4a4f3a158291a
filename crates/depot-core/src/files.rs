// ── File manager controller ──
//
// View state for the stored-file listing plus the actions on it. Every
// network step is split in two: an async `perform_*`/`fetch_*` half that
// can run on a background task, and a synchronous `finish_*` half that
// applies the result. The `load_files`/`delete_file`/... conveniences
// chain both halves for callers that can simply await.

use std::path::{Path, PathBuf};

use depot_api::{DepotClient, FileRecord};
use tracing::{debug, info, warn};

use crate::banner::BannerBoard;
use crate::error::CoreError;
use crate::fetch::fetch_data;
use crate::format::{format_bytes, format_date};
use crate::sequence::{RequestSequencer, Ticket};

/// One rendered row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub filename: String,
    pub size: String,
    pub uploaded: String,
    pub download_count: u64,
}

impl From<&FileRecord> for FileRow {
    fn from(record: &FileRecord) -> Self {
        let size = match (record.size_formatted.is_empty(), record.size) {
            (true, Some(bytes)) => format_bytes(bytes),
            _ => record.size_formatted.clone(),
        };
        Self {
            filename: record.filename.clone(),
            size,
            uploaded: format_date(record.upload_time),
            download_count: record.download_count,
        }
    }
}

/// Listing lifecycle: `Idle → Loading → (Populated | Empty)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    Idle,
    Loading,
    Populated(Vec<FileRow>),
    Empty,
}

impl Listing {
    pub fn rows(&self) -> &[FileRow] {
        match self {
            Self::Populated(rows) => rows,
            _ => &[],
        }
    }
}

/// How a user-triggered action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted it; the listing should be resynchronized.
    Completed,
    /// Reported via banner; nothing else changed.
    Failed,
}

/// Page controller for the file listing and its delete/download/upload actions.
#[derive(Debug, Default)]
pub struct FileManager {
    listing: Listing,
    pending_delete: Option<String>,
    sequencer: RequestSequencer,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Filename awaiting delete confirmation, if the dialog is open.
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Enter `Loading` and issue a ticket for the request about to start.
    pub fn begin_load(&mut self) -> Ticket {
        self.listing = Listing::Loading;
        self.sequencer.issue()
    }

    /// Apply a listing result. Returns `false` if `ticket` was stale and ignored.
    pub fn finish_load(&mut self, ticket: Ticket, files: Option<Vec<FileRecord>>) -> bool {
        if !self.sequencer.accept(ticket) {
            debug!(ticket = ticket.get(), "dropping stale file listing");
            return false;
        }
        self.listing = match files {
            Some(files) if !files.is_empty() => {
                Listing::Populated(files.iter().map(FileRow::from).collect())
            }
            _ => Listing::Empty,
        };
        true
    }

    /// `GET /api/files`, downgraded to `None` (with a banner) on failure.
    pub async fn fetch_files(client: &DepotClient, banners: &BannerBoard) -> Option<Vec<FileRecord>> {
        fetch_data(banners, client.list_files()).await
    }

    /// Reload the listing from the server.
    pub async fn load_files(&mut self, client: &DepotClient, banners: &BannerBoard) {
        let ticket = self.begin_load();
        let files = Self::fetch_files(client, banners).await;
        self.finish_load(ticket, files);
    }

    // ── Delete confirmation ──────────────────────────────────────────

    /// Open the confirmation dialog for `filename`.
    pub fn show_delete_confirmation(&mut self, filename: impl Into<String>) {
        self.pending_delete = Some(filename.into());
    }

    /// Close the dialog without deleting anything.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Close the dialog and hand back the confirmed target.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// `DELETE /api/delete/{filename}`; a non-OK status is an error.
    pub async fn perform_delete(client: &DepotClient, filename: &str) -> Result<String, CoreError> {
        debug!(filename, "deleting file");
        let response = client.delete_file(filename).await?;
        Ok(response.message)
    }

    /// Report a delete result through the banner board.
    pub fn finish_delete(
        banners: &BannerBoard,
        filename: &str,
        result: Result<String, CoreError>,
    ) -> ActionOutcome {
        match result {
            Ok(message) => {
                info!(filename, "file deleted");
                banners.show_success(message);
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!(filename, error = %e, "delete failed");
                banners.show_error(format!("Failed to delete file: {e}"));
                ActionOutcome::Failed
            }
        }
    }

    /// Delete `filename` and reload the listing on success.
    pub async fn delete_file(
        &mut self,
        client: &DepotClient,
        banners: &BannerBoard,
        filename: &str,
    ) -> ActionOutcome {
        let result = Self::perform_delete(client, filename).await;
        let outcome = Self::finish_delete(banners, filename, result);
        if outcome == ActionOutcome::Completed {
            self.load_files(client, banners).await;
        }
        outcome
    }

    /// Confirm the open dialog and delete its target. `None` if no dialog was open.
    pub async fn confirm_and_delete(
        &mut self,
        client: &DepotClient,
        banners: &BannerBoard,
    ) -> Option<ActionOutcome> {
        let filename = self.confirm_delete()?;
        Some(self.delete_file(client, banners, &filename).await)
    }

    // ── Download ─────────────────────────────────────────────────────

    /// Stream `GET /download/{filename}` into `dir`.
    pub async fn perform_download(
        client: &DepotClient,
        filename: &str,
        dir: &Path,
    ) -> Result<PathBuf, CoreError> {
        debug!(filename, dir = %dir.display(), "downloading file");
        Ok(client.download_file(filename, dir).await?)
    }

    pub fn finish_download(
        banners: &BannerBoard,
        filename: &str,
        result: Result<PathBuf, CoreError>,
    ) -> ActionOutcome {
        match result {
            Ok(path) => {
                info!(filename, path = %path.display(), "file downloaded");
                banners.show_success(format!("Saved {}", path.display()));
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!(filename, error = %e, "download failed");
                banners.show_error(format!("Failed to download file: {e}"));
                ActionOutcome::Failed
            }
        }
    }

    /// Download `filename` into `dir`, then reload so the new download count shows.
    pub async fn download_file(
        &mut self,
        client: &DepotClient,
        banners: &BannerBoard,
        filename: &str,
        dir: &Path,
    ) -> ActionOutcome {
        let result = Self::perform_download(client, filename, dir).await;
        let outcome = Self::finish_download(banners, filename, result);
        if outcome == ActionOutcome::Completed {
            self.load_files(client, banners).await;
        }
        outcome
    }

    // ── Upload ───────────────────────────────────────────────────────

    /// Multipart `POST /upload` of a local file. Returns the name the server
    /// stored it under, when that can be derived.
    pub async fn perform_upload(
        client: &DepotClient,
        path: &Path,
    ) -> Result<Option<String>, CoreError> {
        debug!(path = %path.display(), "uploading file");
        Ok(client.upload_file(path).await?)
    }

    pub fn finish_upload(
        banners: &BannerBoard,
        result: Result<Option<String>, CoreError>,
    ) -> ActionOutcome {
        match result {
            Ok(Some(filename)) => {
                info!(filename, "file uploaded");
                banners.show_success(format!("File {filename} uploaded successfully"));
                ActionOutcome::Completed
            }
            Ok(None) => {
                info!("file uploaded");
                banners.show_success("File uploaded successfully");
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                banners.show_error(format!("Failed to upload file: {e}"));
                ActionOutcome::Failed
            }
        }
    }

    /// Upload `path` and reload the listing on success.
    pub async fn upload_file(
        &mut self,
        client: &DepotClient,
        banners: &BannerBoard,
        path: &Path,
    ) -> ActionOutcome {
        let result = Self::perform_upload(client, path).await;
        let outcome = Self::finish_upload(banners, result);
        if outcome == ActionOutcome::Completed {
            self.load_files(client, banners).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerLevel;

    fn record(name: &str) -> FileRecord {
        FileRecord {
            filename: name.into(),
            size: Some(1536),
            size_formatted: "1.5 KB".into(),
            upload_time: 0.0,
            download_count: 3,
        }
    }

    #[test]
    fn missing_data_is_empty_state() {
        let mut fm = FileManager::new();
        let ticket = fm.begin_load();
        assert_eq!(fm.listing(), &Listing::Loading);

        assert!(fm.finish_load(ticket, None));
        assert_eq!(fm.listing(), &Listing::Empty);
    }

    #[test]
    fn empty_list_is_empty_state() {
        let mut fm = FileManager::new();
        let ticket = fm.begin_load();
        fm.finish_load(ticket, Some(Vec::new()));
        assert_eq!(fm.listing(), &Listing::Empty);
    }

    #[test]
    fn rows_follow_records() {
        let mut fm = FileManager::new();
        let ticket = fm.begin_load();
        fm.finish_load(ticket, Some(vec![record("a.txt"), record("b.txt")]));

        let rows = fm.listing().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].filename, "a.txt");
        assert_eq!(rows[0].size, "1.5 KB");
        assert_eq!(rows[0].download_count, 3);
    }

    #[test]
    fn rerender_is_idempotent() {
        let mut fm = FileManager::new();
        for _ in 0..3 {
            let ticket = fm.begin_load();
            fm.finish_load(ticket, Some(vec![record("a.txt")]));
        }
        assert_eq!(fm.listing().rows().len(), 1);
    }

    #[test]
    fn size_falls_back_to_raw_bytes() {
        let mut rec = record("a.txt");
        rec.size_formatted.clear();
        rec.size = Some(2048);
        assert_eq!(FileRow::from(&rec).size, "2 KB");
    }

    #[test]
    fn stale_listing_is_ignored() {
        let mut fm = FileManager::new();
        let old = fm.begin_load();
        let new = fm.begin_load();

        assert!(fm.finish_load(new, Some(vec![record("new.txt")])));
        assert!(!fm.finish_load(old, Some(vec![record("old.txt")])));
        assert_eq!(fm.listing().rows()[0].filename, "new.txt");
    }

    #[test]
    fn cancel_clears_pending_target() {
        let mut fm = FileManager::new();
        fm.show_delete_confirmation("a.txt");
        assert_eq!(fm.pending_delete(), Some("a.txt"));

        fm.cancel_delete();
        assert_eq!(fm.pending_delete(), None);
        assert_eq!(fm.confirm_delete(), None);
    }

    #[test]
    fn confirm_takes_pending_target() {
        let mut fm = FileManager::new();
        fm.show_delete_confirmation("a.txt");
        assert_eq!(fm.confirm_delete().as_deref(), Some("a.txt"));
        assert_eq!(fm.pending_delete(), None);
    }

    #[test]
    fn failed_delete_reports_banner() {
        let banners = BannerBoard::new();
        let outcome = FileManager::finish_delete(
            &banners,
            "a.txt",
            Err(CoreError::Rejected {
                status: 500,
                reason: "Internal Server Error".into(),
            }),
        );

        assert_eq!(outcome, ActionOutcome::Failed);
        let stack = banners.snapshot();
        assert_eq!(stack[0].level, BannerLevel::Error);
        assert_eq!(
            stack[0].message,
            "Failed to delete file: Server returned 500: Internal Server Error"
        );
    }

    #[test]
    fn upload_success_names_file() {
        let banners = BannerBoard::new();
        let outcome = FileManager::finish_upload(&banners, Ok(Some("report.pdf".into())));
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(banners.snapshot()[0].message, "File report.pdf uploaded successfully");
    }

    #[test]
    fn upload_without_derivable_name_still_succeeds() {
        let banners = BannerBoard::new();
        let outcome = FileManager::finish_upload(&banners, Ok(None));
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(banners.snapshot()[0].message, "File uploaded successfully");
    }
}
