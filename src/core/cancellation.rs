//! Cancellation Token
//!
//! A one-shot, shared stop signal. Triggering it sets the flag and then
//! broadcasts to every registered listener so that threads blocked inside
//! a listener's waits observe the stop promptly. Once set it stays set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

/// Something holding blocked threads that must be woken on cancellation
pub trait Wake: Send + Sync {
    /// Wake every thread currently waiting inside this listener
    fn wake_all(&self);
}

/// Shared stop signal observed by the queue and every worker
#[derive(Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    listeners: Mutex<Vec<Weak<dyn Wake>>>,
    sleep_lock: Mutex<()>,
    sleep_signal: Condvar,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_set())
            .finish()
    }
}

impl CancellationToken {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Check whether cancellation has been triggered
    pub fn is_set(&self) -> bool {
        // Acquire pairs with the AcqRel swap in trigger()
        self.cancelled.load(Ordering::Acquire)
    }

    /// Register a listener to be woken when the token is triggered
    ///
    /// Listeners are held weakly; a dropped listener is skipped and pruned.
    pub fn register(&self, listener: Weak<dyn Wake>) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(listener);
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    /// Set the flag and wake everything blocked on it
    ///
    /// Returns `true` for the call that actually set the flag; later calls
    /// are no-ops and return `false`.
    pub fn trigger(&self) -> bool {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Sleepers check the flag under this lock, so taking it here means
        // none of them can miss the notification.
        {
            let _guard = self
                .sleep_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.sleep_signal.notify_all();
        }

        let listeners: Vec<Arc<dyn Wake>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        log::info!(
            "Cancellation triggered; waking {} listener(s)",
            listeners.len()
        );
        for listener in listeners {
            listener.wake_all();
        }

        true
    }

    /// Sleep for `duration` unless cancellation arrives first
    ///
    /// Returns `true` if the whole duration elapsed, `false` if the sleep
    /// was cut short (or never started) because the token is set.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self
            .sleep_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            if self.is_set() {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            guard = match self.sleep_signal.wait_timeout(guard, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}
