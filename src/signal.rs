//! Process-wide wake primitive shared by every producer and the aggregator

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One lock plus one condition variable.
///
/// The lock guards a single `pending` flag. Producers set it after releasing
/// their slot lock; the aggregator waits until it is set and clears it before
/// scanning. A notification sent while the aggregator is busy scanning is
/// therefore kept rather than lost, and a spurious condvar wakeup simply goes
/// back to waiting. Several notifications before the aggregator wakes collapse
/// into one pending wake.
#[derive(Debug, Default)]
pub struct SharedSignal {
    pending: Mutex<bool>,
    cond: Condvar,
}

/// Held by the aggregator for the whole scan-and-publish pass
pub type SignalGuard<'a> = MutexGuard<'a, bool>;

impl SharedSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the aggregator. Never call with a slot lock held.
    pub fn notify(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = true;
        drop(pending);
        self.cond.notify_one();
    }

    /// Block until at least one notification is pending, consume it and
    /// return with the signal lock held.
    pub fn wait(&self) -> SignalGuard<'_> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while !*pending {
            pending = self
                .cond
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *pending = false;
        pending
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// Returns `None` when nothing was signalled in time.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SignalGuard<'_>> {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut pending, _) = self
            .cond
            .wait_timeout_while(pending, timeout, |pending| !*pending)
            .unwrap_or_else(PoisonError::into_inner);
        if !*pending {
            return None;
        }
        *pending = false;
        Some(pending)
    }

    /// Whether a notification is waiting to be consumed
    #[must_use]
    pub fn is_pending(&self) -> bool {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
