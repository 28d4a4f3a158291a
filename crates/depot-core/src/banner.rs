//! Transient, dismissible notifications shown above the active screen.
//!
//! The board is shared between the UI loop and background request tasks,
//! so it lives behind an `Arc<Mutex<_>>`. Banners are kept newest-first,
//! matching insertion at the top of the content area.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Error banners disappear on their own after this long.
pub const BANNER_TTL: Duration = Duration::from_millis(5000);

/// Most sticky banners kept at once; raising another evicts the oldest.
pub const MAX_STICKY: usize = 5;

/// Banner severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Info,
    Success,
    Error,
}

/// A single banner.
#[derive(Debug, Clone)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub level: BannerLevel,
    raised_at: Instant,
    ttl: Option<Duration>,
}

impl Banner {
    /// Whether the banner has outlived its TTL at `now`. Sticky banners never expire.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.raised_at) >= ttl)
    }
}

#[derive(Debug, Default)]
struct Board {
    next_id: u64,
    banners: Vec<Banner>,
}

/// Cloneable handle to the shared banner stack.
#[derive(Debug, Clone, Default)]
pub struct BannerBoard {
    inner: Arc<Mutex<Board>>,
}

impl BannerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        // A panic mid-push cannot leave the Vec torn, so recover the guard.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, level: BannerLevel, message: String, ttl: Option<Duration>) -> u64 {
        let mut board = self.lock();
        board.next_id += 1;
        let id = board.next_id;
        board.banners.insert(
            0,
            Banner {
                id,
                message,
                level,
                raised_at: Instant::now(),
                ttl,
            },
        );
        let sticky = board.banners.iter().filter(|b| b.ttl.is_none()).count();
        if sticky > MAX_STICKY {
            if let Some(oldest) = board.banners.iter().rposition(|b| b.ttl.is_none()) {
                board.banners.remove(oldest);
            }
        }
        id
    }

    /// Raise an error banner that auto-removes after [`BANNER_TTL`].
    pub fn show_error(&self, message: impl Into<String>) -> u64 {
        self.push(BannerLevel::Error, message.into(), Some(BANNER_TTL))
    }

    /// Raise a success banner; it stays until dismissed or pushed out by
    /// [`MAX_STICKY`] newer ones.
    pub fn show_success(&self, message: impl Into<String>) -> u64 {
        self.push(BannerLevel::Success, message.into(), None)
    }

    /// Raise an informational banner with the standard TTL.
    pub fn show_info(&self, message: impl Into<String>) -> u64 {
        self.push(BannerLevel::Info, message.into(), Some(BANNER_TTL))
    }

    /// Remove one banner by id. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut board = self.lock();
        let before = board.banners.len();
        board.banners.retain(|b| b.id != id);
        board.banners.len() != before
    }

    /// Remove the newest banner, if any.
    pub fn dismiss_latest(&self) -> bool {
        let mut board = self.lock();
        if board.banners.is_empty() {
            false
        } else {
            board.banners.remove(0);
            true
        }
    }

    /// Drop every banner whose TTL has elapsed at `now`. Returns how many were removed.
    pub fn expire(&self, now: Instant) -> usize {
        let mut board = self.lock();
        let before = board.banners.len();
        board.banners.retain(|b| !b.is_expired(now));
        before - board.banners.len()
    }

    /// Copy of the current stack, newest first.
    pub fn snapshot(&self) -> Vec<Banner> {
        self.lock().banners.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().banners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_banner_is_on_top() {
        let board = BannerBoard::new();
        board.show_error("first");
        board.show_success("second");

        let stack = board.snapshot();
        assert_eq!(stack[0].message, "second");
        assert_eq!(stack[0].level, BannerLevel::Success);
        assert_eq!(stack[1].message, "first");
    }

    #[test]
    fn errors_expire_after_ttl() {
        let board = BannerBoard::new();
        board.show_error("boom");
        let now = Instant::now();

        assert_eq!(board.expire(now), 0);
        assert_eq!(board.expire(now + BANNER_TTL), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn success_banners_are_sticky() {
        let board = BannerBoard::new();
        board.show_success("deleted");

        assert_eq!(board.expire(Instant::now() + BANNER_TTL * 10), 0);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn sticky_banners_are_capped_oldest_first() {
        let board = BannerBoard::new();
        board.show_error("still ticking");
        for n in 0..MAX_STICKY + 3 {
            board.show_success(format!("saved {n}"));
        }

        let stack = board.snapshot();
        let sticky: Vec<_> = stack
            .iter()
            .filter(|b| b.level == BannerLevel::Success)
            .map(|b| b.message.as_str())
            .collect();
        assert_eq!(sticky.len(), MAX_STICKY);
        assert_eq!(sticky[0], format!("saved {}", MAX_STICKY + 2));
        assert_eq!(sticky[MAX_STICKY - 1], "saved 3");
        assert!(stack.iter().any(|b| b.message == "still ticking"));
    }

    #[test]
    fn dismiss_before_expiry() {
        let board = BannerBoard::new();
        let id = board.show_error("boom");

        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert_eq!(board.expire(Instant::now() + BANNER_TTL), 0);
    }

    #[test]
    fn dismiss_latest_pops_top() {
        let board = BannerBoard::new();
        board.show_info("a");
        board.show_info("b");

        assert!(board.dismiss_latest());
        assert_eq!(board.snapshot()[0].message, "a");
        assert!(board.dismiss_latest());
        assert!(!board.dismiss_latest());
    }

    #[test]
    fn clones_share_one_stack() {
        let board = BannerBoard::new();
        let worker = board.clone();
        worker.show_error("from a task");
        assert_eq!(board.len(), 1);
    }
}
