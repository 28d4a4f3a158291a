//! Read-request wrapper that turns failures into banners.

use std::future::Future;

use tracing::warn;

use crate::banner::BannerBoard;
use crate::error::CoreError;

/// Await a read request; on failure raise an error banner and yield `None`.
///
/// Non-2xx statuses, transport errors and undecodable bodies all take the
/// same path. Callers treat `None` as "no data available" and keep rendering.
pub async fn fetch_data<T, F>(banners: &BannerBoard, request: F) -> Option<T>
where
    F: Future<Output = Result<T, depot_api::Error>>,
{
    match request.await {
        Ok(data) => Some(data),
        Err(e) => {
            let err = CoreError::from(e);
            warn!(error = %err, "fetch failed");
            banners.show_error(format!("Failed to fetch data: {err}"));
            None
        }
    }
}
