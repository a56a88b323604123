//! Point-in-time view of the run counters with derived figures

use crate::queue::Priority;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Share of producer or consumer calls that had to block before the queue
/// is judged frequently full or frequently empty
pub const BLOCK_RATE_THRESHOLD_PERCENT: u64 = 20;

/// Static shape of the run being measured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunShape {
    pub producers: usize,
    pub consumers: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub average_ms: Option<f64>,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

impl LatencyStats {
    pub(crate) fn from_totals(
        count: u64,
        total: Duration,
        min: Option<Duration>,
        max: Option<Duration>,
    ) -> Self {
        let average_ms = match u32::try_from(count) {
            Ok(0) => None,
            Ok(n) => Some(millis(total / n)),
            Err(_) => Some(millis(total) / count as f64),
        };

        Self {
            average_ms,
            min_ms: min.map(millis),
            max_ms: max.map(millis),
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityShare {
    pub priority: Priority,
    pub count: u64,
    pub percent: f64,
}

impl PriorityShare {
    pub(crate) fn new(priority: Priority, count: u64, total: u64) -> Self {
        Self {
            priority,
            count,
            percent: percent_of(count, total).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throughput {
    pub produced_per_sec: f64,
    pub consumed_per_sec: f64,
    pub per_producer: f64,
    pub per_consumer: f64,
}

/// Balance assessment derived from block rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Utilisation {
    /// Producers blocked on a full queue in more than 20% of their calls
    FrequentlyFull,
    /// Consumers blocked on an empty queue in more than 20% of their calls
    FrequentlyEmpty,
    WellBalanced,
}

impl Utilisation {
    pub fn assess(
        produced: u64,
        consumed: u64,
        producer_blocks: u64,
        consumer_blocks: u64,
    ) -> Self {
        // Compared in integers: blocks / calls > threshold / 100
        let exceeds = |blocks: u64, calls: u64| {
            u128::from(blocks) * 100 > u128::from(calls) * u128::from(BLOCK_RATE_THRESHOLD_PERCENT)
        };
        if exceeds(producer_blocks, produced) {
            Utilisation::FrequentlyFull
        } else if exceeds(consumer_blocks, consumed) {
            Utilisation::FrequentlyEmpty
        } else {
            Utilisation::WellBalanced
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Utilisation::FrequentlyFull => "consider more consumers or a larger queue",
            Utilisation::FrequentlyEmpty => "consider more producers or fewer consumers",
            Utilisation::WellBalanced => "producers and consumers are well matched",
        }
    }
}

impl fmt::Display for Utilisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Utilisation::FrequentlyFull => "FREQUENTLY FULL",
            Utilisation::FrequentlyEmpty => "FREQUENTLY EMPTY",
            Utilisation::WellBalanced => "WELL-BALANCED",
        })
    }
}

/// Counters plus everything computed from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub shape: RunShape,
    pub elapsed_secs: f64,
    pub produced: u64,
    pub consumed: u64,
    /// Produced but not yet consumed; never negative
    pub in_flight: u64,
    pub throughput: Throughput,
    pub latency: LatencyStats,
    /// Consumed items per class, highest first
    pub priority_distribution: Vec<PriorityShare>,
    pub producer_blocks: u64,
    pub consumer_blocks: u64,
    pub producer_block_percent: Option<f64>,
    pub consumer_block_percent: Option<f64>,
    pub utilisation: Utilisation,
    /// Consumed as a percentage of produced
    pub efficiency_percent: Option<f64>,
}

impl MetricsSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        shape: RunShape,
        elapsed: Duration,
        produced: u64,
        consumed: u64,
        producer_blocks: u64,
        consumer_blocks: u64,
        latency: LatencyStats,
        priority_distribution: Vec<PriorityShare>,
    ) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        let produced_per_sec = rate(produced, elapsed_secs);
        let consumed_per_sec = rate(consumed, elapsed_secs);

        let throughput = Throughput {
            produced_per_sec,
            consumed_per_sec,
            per_producer: share(produced_per_sec, shape.producers),
            per_consumer: share(consumed_per_sec, shape.consumers),
        };

        Self {
            shape,
            elapsed_secs,
            produced,
            consumed,
            in_flight: produced.saturating_sub(consumed),
            throughput,
            latency,
            priority_distribution,
            producer_blocks,
            consumer_blocks,
            producer_block_percent: percent_of(producer_blocks, produced),
            consumer_block_percent: percent_of(consumer_blocks, consumed),
            utilisation: Utilisation::assess(produced, consumed, producer_blocks, consumer_blocks),
            efficiency_percent: percent_of(consumed, produced),
        }
    }
}

fn rate(count: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        count as f64 / elapsed_secs
    } else {
        0.0
    }
}

fn share(total_rate: f64, workers: usize) -> f64 {
    if workers == 0 {
        0.0
    } else {
        total_rate / workers as f64
    }
}

fn percent_of(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 * 100.0 / whole as f64)
}
