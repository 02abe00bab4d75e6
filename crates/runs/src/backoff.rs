//! Contention backoff: bounded randomized wait with cancellation
//!
//! ## Design
//!
//! Losing a compare-and-swap race is normal; the only response is to wait a
//! short random interval and retry, so correlated retries across submitters
//! decay instead of stampeding. The jitter is a plain bounded uniform draw,
//! not exponential — contention here is short-lived counter traffic.
//!
//! The wait is sliced so a cancellation request is observed promptly rather
//! than after a full backoff interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use runway_core::{Error, Result};

/// Upper bound of one backoff interval
const DEFAULT_MAX: Duration = Duration::from_millis(200);

/// Granularity of cancellation polling during a wait
const POLL_SLICE: Duration = Duration::from_millis(10);

/// Randomized, cancellable retry backoff
///
/// Cloning shares the rng and the cancellation flag, so one handle can cancel
/// waits in progress on another thread.
#[derive(Debug, Clone)]
pub struct Backoff {
    rng: Arc<Mutex<StdRng>>,
    max: Duration,
    cancelled: Arc<AtomicBool>,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Backoff {
    /// Create a backoff with the default 0–200 ms jitter, seeded from entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), DEFAULT_MAX)
    }

    /// Create a deterministic backoff for tests
    pub fn with_rng_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), DEFAULT_MAX)
    }

    /// Create a backoff with a custom jitter bound
    ///
    /// `Duration::ZERO` disables sleeping entirely (useful in tests that
    /// still want the cancellation check).
    pub fn with_max(max: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), max)
    }

    fn with_rng(rng: StdRng, max: Duration) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
            max,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared cancellation flag
    ///
    /// Setting it makes every in-progress and future [`wait`](Backoff::wait)
    /// return [`Error::Interrupted`].
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait one jittered interval, observing cancellation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] if cancellation is requested before or
    /// during the wait.
    pub fn wait(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Interrupted);
        }

        let mut remaining = self.jitter();
        while !remaining.is_zero() {
            let slice = remaining.min(POLL_SLICE);
            std::thread::sleep(slice);
            remaining -= slice;

            if self.is_cancelled() {
                return Err(Error::Interrupted);
            }
        }
        Ok(())
    }

    fn jitter(&self) -> Duration {
        let max_millis = self.max.as_millis() as u64;
        if max_millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.lock().gen_range(0..max_millis))
    }
}
