//! Bounded Priority Queue Component
//!
//! A fixed-capacity, thread-safe queue sitting between any number of
//! producer and consumer threads. Producers block while the queue is full,
//! consumers block while it is empty, and both are released by a shared
//! cancellation token.
//!
//! # Overview
//!
//! - **Priority Jump**: dequeue returns the highest-priority resident item,
//!   overtaking older items of lower priority
//! - **FIFO Within Class**: items of equal priority leave in arrival order
//! - **Backpressure**: producers wait for space, consumers wait for data
//! - **Cancellation**: triggering the token wakes every waiter, and every
//!   later call returns [`QueueError::Cancelled`]
//! - **Exact Wait Reporting**: the `*_observed` calls report whether the
//!   caller actually had to wait
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐  ┌────────────┐
//! │ Producer 1 │  │ Producer 2 │  │ Producer N │
//! └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!       │ enqueue       │ enqueue       │ enqueue   (waits on not_full)
//!       ▼               ▼               ▼
//! ┌─────────────────────────────────────────────┐
//! │ PriorityQueue        Mutex<RingBuffer>      │
//! │  head ─► ┌───┬───┬───┬───┬───┐ ◄─ tail      │
//! │          │ L │ H │ N │ L │   │              │
//! │          └───┴───┴───┴───┴───┘              │
//! │  not_full / not_empty condition variables   │
//! └─────────────────────┬───────────────────────┘
//!       │ dequeue (highest priority, oldest first; waits on not_empty)
//!       ▼               ▼
//! ┌────────────┐  ┌────────────┐
//! │ Consumer 1 │  │ Consumer M │
//! └────────────┘  └────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use prioflow::core::cancellation::CancellationToken;
//! use prioflow::queue::{Item, Priority, PriorityQueue};
//! use std::time::Instant;
//!
//! # fn example() -> Result<(), prioflow::queue::QueueError> {
//! let token = CancellationToken::new();
//! let queue = PriorityQueue::new(3, token.clone())?;
//!
//! let now = Instant::now();
//! queue.enqueue(Item::new(1, Priority::Low, 1, now, 1))?;
//! queue.enqueue(Item::new(9, Priority::High, 1, now, 2))?;
//! queue.enqueue(Item::new(2, Priority::Low, 1, now, 3))?;
//!
//! let order: Vec<u64> = (0..3)
//!     .map(|_| queue.dequeue().map(|item| item.sequence()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(order, vec![2, 1, 3]);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod buffer;
mod error;
mod item;
mod priority_queue;
mod traits;

pub use buffer::RingBuffer;
pub use error::{QueueError, QueueResult};
pub use item::{Item, Priority};
pub use priority_queue::{PriorityQueue, WaitOutcome, MAX_QUEUE_CAPACITY};
pub use traits::{Prioritized, PriorityStore};

#[cfg(test)]
mod tests;
