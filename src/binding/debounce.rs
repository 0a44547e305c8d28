//! Trailing-edge debounce primitive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Coalesces bursts of triggers so only the last one in a window proceeds.
///
/// Every `settle()` takes a fresh token and waits out the delay; it resolves
/// to `true` only if no later `settle()` or `cancel()` happened meanwhile.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    token: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            token: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the window. `true` if this trigger is still the latest.
    pub async fn settle(&self) -> bool {
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            futures_timer::Delay::new(self.delay).await;
        }
        self.token.load(Ordering::SeqCst) == token
    }

    /// Run `f` after the window unless superseded.
    pub async fn run<F, Fut, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        if self.settle().await {
            Some(f().await)
        } else {
            None
        }
    }

    /// Invalidate every pending `settle()`.
    pub fn cancel(&self) {
        self.token.fetch_add(1, Ordering::SeqCst);
    }
}
