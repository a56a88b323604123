//! Random item and pacing generation

use crate::queue::{Item, Priority};
use std::time::{Duration, Instant};

/// Upper bound (inclusive) of generated item values
pub const MAX_ITEM_VALUE: u32 = 9;

/// Builds a producer's items: random value, banded priority, and a
/// sequence number that starts at 1 and increases by one per item
#[derive(Debug)]
pub struct ItemGenerator {
    producer_id: usize,
    rng: fastrand::Rng,
    next_sequence: u64,
}

impl ItemGenerator {
    pub fn new(producer_id: usize) -> Self {
        Self::from_rng(producer_id, fastrand::Rng::new())
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(producer_id: usize, seed: u64) -> Self {
        Self::from_rng(producer_id, fastrand::Rng::with_seed(seed))
    }

    fn from_rng(producer_id: usize, rng: fastrand::Rng) -> Self {
        Self {
            producer_id,
            rng,
            next_sequence: 1,
        }
    }

    pub fn next_item(&mut self, produced_at: Instant) -> Item {
        let value = self.rng.u32(0..=MAX_ITEM_VALUE);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        Item::new(
            value,
            Priority::from_value(value),
            self.producer_id,
            produced_at,
            sequence,
        )
    }
}

/// Random pause between two iterations of a worker loop
#[derive(Debug)]
pub struct Pacing {
    rng: fastrand::Rng,
    max_wait: Duration,
}

impl Pacing {
    pub fn new(max_wait: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng, max_wait }
    }

    /// Next pause, between one second and `max_wait` inclusive
    ///
    /// A `max_wait` under one second pauses for exactly `max_wait`, and a
    /// zero `max_wait` disables pacing.
    pub fn next_delay(&mut self) -> Duration {
        let max_ms = u64::try_from(self.max_wait.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let min_ms = max_ms.min(1000);
        Duration::from_millis(self.rng.u64(min_ms..=max_ms))
    }
}
