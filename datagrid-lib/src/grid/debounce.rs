//! Keystroke debouncing.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Coalesces bursts of filter input.
///
/// Every call to [`debounce`](Self::debounce) waits for the quiet period;
/// only the most recent call returns `true`.
#[derive(Debug)]
pub struct FilterDebouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl FilterDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    /// Waits out the quiet period; `false` if a newer call arrived meanwhile.
    pub async fn debounce(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
