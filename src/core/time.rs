//! Clock abstraction used for latency measurement and run timestamps

#[cfg(test)]
use std::sync::{Arc, Mutex, PoisonError};
#[cfg(test)]
use std::time::Duration;
use std::time::{Instant, SystemTime};

/// Source of monotonic and wall-clock time
///
/// Consumers read `now()` to compute item latency; the run summary uses
/// `system_time()` for its start and end stamps.
pub trait TimeProvider: Send + Sync {
    /// Current monotonic time, for intervals
    fn now(&self) -> Instant;

    /// Current wall-clock time, for timestamps
    fn system_time(&self) -> SystemTime;
}

/// Clock backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for deterministic latency tests
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current_instant: Arc<Mutex<Instant>>,
    current_system_time: Arc<Mutex<SystemTime>>,
}

#[cfg(test)]
impl MockTimeProvider {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start the monotonic clock at `instant`
    pub fn starting_at(instant: Instant) -> Self {
        Self {
            current_instant: Arc::new(Mutex::new(instant)),
            current_system_time: Arc::new(Mutex::new(SystemTime::now())),
        }
    }

    /// Move both clocks forward by `duration`
    pub fn advance(&self, duration: Duration) {
        *self
            .current_instant
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += duration;
        *self
            .current_system_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += duration;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        *self
            .current_instant
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn system_time(&self) -> SystemTime {
        *self
            .current_system_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
