//! Producer and consumer workers
//!
//! Each worker is an OS thread running a loop against the shared
//! [`PriorityQueue`](crate::queue::PriorityQueue): produce or consume one
//! item, report it to the [`MetricsSink`](crate::metrics::MetricsSink),
//! then pause for a random interval. The loop ends when the shared
//! [`CancellationToken`](crate::core::cancellation::CancellationToken) is
//! triggered, whether the worker is pausing or blocked inside the queue.
//!
//! ```text
//!   producer-1 ─┐                         ┌─ consumer-1
//!   producer-2 ─┼──► PriorityQueue<Item> ─┼─ consumer-2
//!   producer-N ─┘          ▲              └─ consumer-M
//!                          │ trigger()
//!                  CancellationToken
//! ```

mod consumer;
pub mod error;
mod generator;
mod pool;
mod producer;

pub use consumer::Consumer;
pub use error::{WorkerError, WorkerResult};
pub use generator::{ItemGenerator, Pacing, MAX_ITEM_VALUE};
pub use pool::WorkerPool;
pub use producer::Producer;

use crate::core::cancellation::CancellationToken;
use crate::core::time::TimeProvider;
use crate::metrics::MetricsSink;
use crate::queue::{Item, PriorityQueue};
use clap::ValueEnum;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// Which side of the queue a worker sits on
#[derive(Display, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Consumer,
}

/// How a worker decides that it was blocked by the queue
#[derive(ValueEnum, Display, EnumString, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum BlockDetection {
    /// Reported by the queue call itself: it waited at least once
    #[default]
    Exact,
    /// Peek at `is_full`/`is_empty` just before the call; approximate,
    /// since the state can change between the peek and the call
    Sampled,
}

/// Settings shared by every worker in a pool
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    pub producers: usize,
    pub consumers: usize,
    pub producer_max_wait: Duration,
    pub consumer_max_wait: Duration,
    pub block_detection: BlockDetection,
    /// Base seed for reproducible runs; worker `n` uses `seed + n`
    pub seed: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            producers: 1,
            consumers: 1,
            producer_max_wait: Duration::from_secs(3),
            consumer_max_wait: Duration::from_secs(4),
            block_detection: BlockDetection::Exact,
            seed: None,
        }
    }
}

impl WorkerConfig {
    pub(crate) fn seed_for(&self, role: Role, id: usize) -> Option<u64> {
        // Producers and consumers draw from disjoint seed ranges
        let offset = match role {
            Role::Producer => id as u64,
            Role::Consumer => (self.producers + id) as u64,
        };
        self.seed.map(|seed| seed.wrapping_add(offset))
    }
}

/// What one worker did before it stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub id: usize,
    pub role: Role,
    /// Items produced or consumed
    pub processed: u64,
    /// Calls that were reported as blocked
    pub blocked: u64,
}

impl WorkerReport {
    pub fn new(id: usize, role: Role) -> Self {
        Self {
            id,
            role,
            processed: 0,
            blocked: 0,
        }
    }

    /// Thread name of the worker, e.g. `consumer-2`
    pub fn name(&self) -> String {
        thread_name(self.role, self.id)
    }
}

pub(crate) fn thread_name(role: Role, id: usize) -> String {
    format!("{}-{}", role, id)
}

/// Handles every worker needs
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<PriorityQueue<Item>>,
    pub sink: Arc<dyn MetricsSink>,
    pub clock: Arc<dyn TimeProvider>,
}

impl WorkerContext {
    pub fn token(&self) -> &Arc<CancellationToken> {
        self.queue.token()
    }
}

/// Triggers the token if the owning worker thread unwinds
pub(crate) struct CancelOnPanic(pub Arc<CancellationToken>);

impl Drop for CancelOnPanic {
    fn drop(&mut self) {
        if std::thread::panicking() {
            log::error!("Worker panicked; cancelling remaining workers");
            self.0.trigger();
        }
    }
}
