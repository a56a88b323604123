//! Traits for the queue system
//!
//! These traits are the seams of the priority queue: what an entry must
//! expose to be ranked, and what a backing store must provide so the
//! blocking layer can stay independent of how entries are laid out.

use crate::queue::item::Priority;

/// Anything the queue can rank by priority
///
/// # Example Implementation
///
/// ```rust
/// use prioflow::queue::{Prioritized, Priority};
///
/// struct Job {
///     urgent: bool,
/// }
///
/// impl Prioritized for Job {
///     fn priority(&self) -> Priority {
///         if self.urgent { Priority::High } else { Priority::Normal }
///     }
/// }
/// ```
pub trait Prioritized {
    /// Priority class used by the priority-jump removal rule
    fn priority(&self) -> Priority;
}

/// Fixed-capacity storage with priority-jump removal
///
/// Implementations are driven exclusively under the queue lock, so they need
/// no synchronisation of their own. The contract every implementation must
/// honour:
///
/// - `push` appends at the logical tail and never exceeds `capacity`
/// - `take_highest` removes the entry with the greatest priority, picking
///   the earliest-inserted one among equals, and keeps the relative order
///   of everything left behind
pub trait PriorityStore<T: Prioritized> {
    /// Maximum number of entries the store can hold
    fn capacity(&self) -> usize;

    /// Number of entries currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Append at the logical tail
    ///
    /// Returns the entry back when the store is already full.
    fn push(&mut self, entry: T) -> Result<(), T>;

    /// Remove and return the highest-priority, oldest entry
    fn take_highest(&mut self) -> Option<T>;
}
