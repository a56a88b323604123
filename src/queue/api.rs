//! Public API for the queue system
//!
//! External modules should import from here rather than directly from
//! internal modules. See module documentation for usage and architecture.

// Core queue components
pub use crate::queue::priority_queue::{PriorityQueue, WaitOutcome, MAX_QUEUE_CAPACITY};

// Item types
pub use crate::queue::item::{Item, Priority};

// Backing store seam
pub use crate::queue::buffer::RingBuffer;
pub use crate::queue::traits::{Prioritized, PriorityStore};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
