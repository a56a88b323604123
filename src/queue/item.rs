//! Item Types for the Priority Queue
//!
//! Items are immutable value objects created by a producer and moved out of
//! the queue to exactly one consumer.

use serde::Serialize;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::queue::traits::Prioritized;

/// Priority class of an item
///
/// Variants are declared lowest first so the derived `Ord` matches the
/// dequeue rule: a greater priority is removed before a lesser one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[derive(EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Priority {
    /// Numeric level used by the reference deployment (0, 5 or 9)
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Normal => 5,
            Self::High => 9,
        }
    }

    /// Band a generated value into a priority class
    ///
    /// Values 7 and above are high, 4 to 6 normal, anything lower is low.
    pub fn from_value(value: u32) -> Self {
        if value >= 7 {
            Self::High
        } else if value >= 4 {
            Self::Normal
        } else {
            Self::Low
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A unit of work travelling from one producer to one consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    value: u32,
    priority: Priority,
    producer_id: usize,
    produced_at: Instant,
    sequence: u64,
}

impl Item {
    pub fn new(
        value: u32,
        priority: Priority,
        producer_id: usize,
        produced_at: Instant,
        sequence: u64,
    ) -> Self {
        Self {
            value,
            priority,
            producer_id,
            produced_at,
            sequence,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn producer_id(&self) -> usize {
        self.producer_id
    }

    /// Arrival timestamp taken when the producer built the item
    pub fn produced_at(&self) -> Instant {
        self.produced_at
    }

    /// Per-producer sequence number, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time elapsed between production and `now`
    ///
    /// Saturates to zero if `now` precedes the production timestamp.
    pub fn latency_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.produced_at)
    }
}

impl Prioritized for Item {
    fn priority(&self) -> Priority {
        self.priority
    }
}
