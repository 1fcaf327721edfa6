//! Single-slot cancellable delayed-callback scheduler.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Token identifying one arming of a [`TurnTimer`].
///
/// The callback receives the generation it was armed with so the owner can
/// re-check [`TurnTimer::is_current`] inside its own serialization domain:
/// a timer superseded between waking up and acquiring the owner's lock must
/// never act on the newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerGeneration(u64);

/// Delayed-callback scheduler holding at most one pending timer.
///
/// Starting a timer supersedes any pending one; superseded callbacks never
/// run. Scheduling requires an ambient tokio runtime — without one the arm
/// is a logged no-op, and a runtime shutting down before the delay elapses
/// likewise suppresses the callback.
#[derive(Debug, Default)]
pub struct TurnTimer {
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl TurnTimer {
    /// Creates a timer with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending timer, then schedules `callback` to run once
    /// after `delay`.
    pub fn start<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce(TimerGeneration) + Send + 'static,
    {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let armed = TimerGeneration(self.generation.fetch_add(1, Ordering::AcqRel) + 1);
        let generation = Arc::clone(&self.generation);

        let Ok(runtime) = Handle::try_current() else {
            debug!(delay_ms = delay.as_millis() as u64, "no async runtime; timer suppressed");
            return;
        };
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::Acquire) == armed.0 {
                callback(armed);
            }
        }));
    }

    /// Whether `generation` still names the most recently started timer.
    pub fn is_current(&self, generation: TimerGeneration) -> bool {
        self.generation.load(Ordering::Acquire) == generation.0
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
