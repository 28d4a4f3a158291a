// ── Periodic poll task ──
//
// Cancellable fixed-period timer. The first tick fires immediately, so a
// freshly started poller fetches at once and then every `period`.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a running poll loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a loop that awaits `tick()` now and then every `period`.
    ///
    /// Must be called inside a tokio runtime. Ticks missed while a slow
    /// `tick()` is still running are skipped rather than bunched up.
    pub fn start<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // `interval` panics on a zero period.
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = interval.tick() => {
                        tokio::select! {
                            biased;
                            () = token.cancelled() => break,
                            () = tick() => {}
                        }
                    }
                }
            }
            debug!("poller stopped");
        });

        debug!(period_ms = period.as_millis(), "poller started");
        Self { cancel, handle }
    }

    /// Stop the loop. An in-flight tick is abandoned.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_poller(period: Duration) -> (Poller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let poller = Poller::start(period, move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });
        (poller, count)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_each_period() {
        let (poller, count) = counting_poller(Duration::from_millis(5000));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticks() {
        let (poller, count) = counting_poller(Duration::from_millis(5000));
        tokio::time::sleep(Duration::from_millis(1)).await;

        poller.stop();
        assert!(!poller.is_running());
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let (poller, count) = counting_poller(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(poller);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
