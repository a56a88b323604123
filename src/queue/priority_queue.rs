//! Bounded blocking priority queue
//!
//! One mutex guards the backing store; two condition variables carry the
//! "space available" and "item available" signals. Every wait is a recheck
//! loop against both the occupancy predicate and the cancellation token, so
//! spurious wakeups and the cancellation race are handled the same way.

use crate::core::cancellation::{CancellationToken, Wake};
use crate::core::sync::handle_mutex_poison;
use crate::queue::buffer::RingBuffer;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::{Prioritized, PriorityStore};
use std::marker::PhantomData;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};

/// Largest capacity accepted by [`PriorityQueue::new`]
pub const MAX_QUEUE_CAPACITY: usize = 20;

/// Whether a blocking call had to suspend before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Completed without waiting on a condition variable
    Immediate,
    /// Waited at least once for space (enqueue) or data (dequeue)
    Blocked,
}

impl WaitOutcome {
    pub fn blocked(self) -> bool {
        self == WaitOutcome::Blocked
    }
}

/// Fixed-capacity, priority-ordered queue shared by producers and consumers
///
/// # Thread Safety
///
/// Shared as `Arc<PriorityQueue>`. All mutation happens under the single
/// internal lock; the snapshot queries (`size`, `is_full`, `is_empty`) may
/// be stale by the time the caller acts on them.
///
/// # Example
///
/// ```rust
/// use prioflow::core::cancellation::CancellationToken;
/// use prioflow::queue::{Item, Priority, PriorityQueue};
/// use std::time::Instant;
///
/// # fn example() -> Result<(), prioflow::queue::QueueError> {
/// let token = CancellationToken::new();
/// let queue = PriorityQueue::new(4, token.clone())?;
///
/// queue.enqueue(Item::new(2, Priority::Low, 1, Instant::now(), 1))?;
/// queue.enqueue(Item::new(8, Priority::High, 1, Instant::now(), 2))?;
///
/// assert_eq!(queue.dequeue()?.value(), 8);
///
/// token.trigger();
/// assert!(queue.dequeue().unwrap_err().is_cancelled());
/// # Ok(())
/// # }
/// ```
pub struct PriorityQueue<T, S = RingBuffer<T>> {
    store: Mutex<S>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    token: Arc<CancellationToken>,
    _entries: PhantomData<fn(T) -> T>,
}

impl<T> PriorityQueue<T, RingBuffer<T>>
where
    T: Prioritized + Send + 'static,
{
    /// Create a queue backed by a ring buffer of `capacity` slots
    ///
    /// Fails with [`QueueError::InvalidCapacity`] unless
    /// `1 <= capacity <= MAX_QUEUE_CAPACITY`.
    pub fn new(capacity: usize, token: Arc<CancellationToken>) -> QueueResult<Arc<Self>> {
        Self::with_max_capacity(capacity, MAX_QUEUE_CAPACITY, token)
    }

    /// Create a queue with a different upper capacity policy
    pub fn with_max_capacity(
        capacity: usize,
        max_capacity: usize,
        token: Arc<CancellationToken>,
    ) -> QueueResult<Arc<Self>> {
        validate_capacity(capacity, max_capacity)?;

        let store = RingBuffer::try_with_capacity(capacity).map_err(|e| {
            let message = e.to_string();
            QueueError::Allocation { capacity, message }
        })?;

        Self::with_store(store, token)
    }
}

impl<T, S> PriorityQueue<T, S>
where
    T: Prioritized + Send + 'static,
    S: PriorityStore<T> + Send + 'static,
{
    /// Create a queue over an already allocated, empty store
    pub fn with_store(store: S, token: Arc<CancellationToken>) -> QueueResult<Arc<Self>> {
        let capacity = store.capacity();
        validate_capacity(capacity, usize::MAX)?;

        let queue = Arc::new(Self {
            store: Mutex::new(store),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            token: Arc::clone(&token),
            _entries: PhantomData,
        });

        let listener: Weak<Self> = Arc::downgrade(&queue);
        token.register(listener);
        log::debug!("Initialised priority queue with capacity {}", capacity);

        Ok(queue)
    }

    /// Insert `item` at the logical tail, blocking while the queue is full
    ///
    /// Returns [`QueueError::Cancelled`] without inserting once the token
    /// is set.
    pub fn enqueue(&self, item: T) -> QueueResult<()> {
        self.enqueue_observed(item).map(|_| ())
    }

    /// Like [`enqueue`](Self::enqueue), also reporting whether it blocked
    pub fn enqueue_observed(&self, item: T) -> QueueResult<WaitOutcome> {
        let mut store = self.lock()?;
        let mut outcome = WaitOutcome::Immediate;

        while store.is_full() && !self.token.is_set() {
            outcome = WaitOutcome::Blocked;
            store = handle_mutex_poison(self.not_full.wait(store), poisoned)?;
        }

        if self.token.is_set() {
            return Err(QueueError::Cancelled);
        }

        let priority = item.priority();
        if store.push(item).is_err() {
            return Err(QueueError::Synchronisation {
                message: "store rejected an entry while reporting free space".to_string(),
            });
        }
        log::trace!(
            "Enqueued {} item | queue size {}/{}",
            priority,
            store.len(),
            self.capacity
        );

        self.not_empty.notify_one();
        Ok(outcome)
    }

    /// Remove the highest-priority item, blocking while the queue is empty
    ///
    /// Among items of equal priority the earliest inserted is returned.
    /// Returns [`QueueError::Cancelled`] without removing anything once the
    /// token is set.
    pub fn dequeue(&self) -> QueueResult<T> {
        self.dequeue_observed().map(|(item, _)| item)
    }

    /// Like [`dequeue`](Self::dequeue), also reporting whether it blocked
    pub fn dequeue_observed(&self) -> QueueResult<(T, WaitOutcome)> {
        let mut store = self.lock()?;
        let mut outcome = WaitOutcome::Immediate;

        while store.is_empty() && !self.token.is_set() {
            outcome = WaitOutcome::Blocked;
            store = handle_mutex_poison(self.not_empty.wait(store), poisoned)?;
        }

        if self.token.is_set() {
            return Err(QueueError::Cancelled);
        }

        let item = store
            .take_highest()
            .ok_or_else(|| QueueError::Synchronisation {
                message: "store was empty after reporting available data".to_string(),
            })?;
        log::trace!(
            "Dequeued {} item | queue size {}/{}",
            item.priority(),
            store.len(),
            self.capacity
        );

        self.not_full.notify_one();
        Ok((item, outcome))
    }

    /// Snapshot of the number of stored items
    pub fn size(&self) -> usize {
        self.snapshot().len()
    }

    /// Snapshot check for a full queue; may be stale once returned
    pub fn is_full(&self) -> bool {
        self.snapshot().is_full()
    }

    /// Snapshot check for an empty queue; may be stale once returned
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The token this queue observes
    pub fn token(&self) -> &Arc<CancellationToken> {
        &self.token
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, S>> {
        handle_mutex_poison(self.store.lock(), poisoned)
    }

    // Snapshot reads never mutate, so a poisoned store is still readable
    fn snapshot(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, S> Wake for PriorityQueue<T, S>
where
    T: Send,
    S: Send,
{
    fn wake_all(&self) {
        // Holding the lock orders this broadcast after any waiter's
        // predicate check, so no waiter can sleep through it.
        let _store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}

impl<T, S> Drop for PriorityQueue<T, S> {
    fn drop(&mut self) {
        log::debug!("Releasing priority queue (capacity {})", self.capacity);
    }
}

impl<T, S> std::fmt::Debug for PriorityQueue<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("capacity", &self.capacity)
            .field("cancelled", &self.token.is_set())
            .finish()
    }
}

fn poisoned(message: String) -> QueueError {
    QueueError::Synchronisation { message }
}

fn validate_capacity(capacity: usize, max_capacity: usize) -> QueueResult<()> {
    if capacity == 0 || capacity > max_capacity {
        return Err(QueueError::InvalidCapacity {
            capacity,
            max: max_capacity,
        });
    }
    Ok(())
}
