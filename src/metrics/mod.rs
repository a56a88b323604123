//! Run metrics
//!
//! Workers report events to a [`MetricsSink`] after each queue call
//! returns. [`Analytics`] is the collecting implementation; it keeps each
//! counter group behind its own lock so producers and consumers never
//! contend with each other while recording.

pub mod report;
mod snapshot;

pub use snapshot::{
    LatencyStats, MetricsSnapshot, PriorityShare, RunShape, Throughput, Utilisation,
};

use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::queue::Priority;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

/// Receiver of worker events
pub trait MetricsSink: Send + Sync {
    fn record_produced(&self);

    fn record_consumed(&self, priority: Priority, latency: Duration);

    /// A producer found the queue full
    fn record_producer_blocked(&self);

    /// A consumer found the queue empty
    fn record_consumer_blocked(&self);

    fn snapshot(&self) -> MetricsSnapshot;
}

#[derive(Debug, Default)]
struct ConsumedStats {
    count: u64,
    total_latency: Duration,
    min_latency: Option<Duration>,
    max_latency: Option<Duration>,
    by_priority: [u64; 3],
}

/// Thread-safe collector of run statistics
pub struct Analytics {
    shape: RunShape,
    clock: Arc<dyn TimeProvider>,
    started_at: Instant,
    produced: Mutex<u64>,
    consumed: Mutex<ConsumedStats>,
    producer_blocks: Mutex<u64>,
    consumer_blocks: Mutex<u64>,
}

impl Analytics {
    pub fn new(shape: RunShape) -> Self {
        Self::with_clock(shape, Arc::new(SystemTimeProvider))
    }

    /// Collector whose elapsed time is measured on `clock`
    pub fn with_clock(shape: RunShape, clock: Arc<dyn TimeProvider>) -> Self {
        let started_at = clock.now();
        Self {
            shape,
            clock,
            started_at,
            produced: Mutex::new(0),
            consumed: Mutex::new(ConsumedStats::default()),
            producer_blocks: Mutex::new(0),
            consumer_blocks: Mutex::new(0),
        }
    }

    pub fn shape(&self) -> &RunShape {
        &self.shape
    }
}

// Counters stay meaningful after a panicking recorder, so poisoning is ignored
fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn priority_index(priority: Priority) -> usize {
    match priority {
        Priority::Low => 0,
        Priority::Normal => 1,
        Priority::High => 2,
    }
}

impl MetricsSink for Analytics {
    fn record_produced(&self) {
        *relock(&self.produced) += 1;
    }

    fn record_consumed(&self, priority: Priority, latency: Duration) {
        let mut stats = relock(&self.consumed);
        stats.count += 1;
        stats.total_latency += latency;
        stats.min_latency = Some(stats.min_latency.map_or(latency, |min| min.min(latency)));
        stats.max_latency = Some(stats.max_latency.map_or(latency, |max| max.max(latency)));
        stats.by_priority[priority_index(priority)] += 1;
    }

    fn record_producer_blocked(&self) {
        *relock(&self.producer_blocks) += 1;
    }

    fn record_consumer_blocked(&self) {
        *relock(&self.consumer_blocks) += 1;
    }

    fn snapshot(&self) -> MetricsSnapshot {
        let produced = *relock(&self.produced);
        let producer_blocks = *relock(&self.producer_blocks);
        let consumer_blocks = *relock(&self.consumer_blocks);
        let (consumed, latency, by_priority) = {
            let stats = relock(&self.consumed);
            let latency = LatencyStats::from_totals(
                stats.count,
                stats.total_latency,
                stats.min_latency,
                stats.max_latency,
            );
            (stats.count, latency, stats.by_priority)
        };

        let distribution = Priority::iter()
            .rev()
            .map(|priority| {
                PriorityShare::new(priority, by_priority[priority_index(priority)], consumed)
            })
            .collect();

        let elapsed = self.clock.now().saturating_duration_since(self.started_at);

        MetricsSnapshot::build(
            self.shape.clone(),
            elapsed,
            produced,
            consumed,
            producer_blocks,
            consumer_blocks,
            latency,
            distribution,
        )
    }
}
