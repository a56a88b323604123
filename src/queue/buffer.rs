//! Fixed-capacity circular buffer with priority-jump removal
//!
//! Entries are kept in insertion order between `head` and `tail`. Removal
//! scans the logical sequence for the highest priority (earliest entry wins
//! ties) and closes the gap by shifting every later entry one slot towards
//! the head. Removing the head itself is a plain head advance.
//!
//! Dequeue is therefore O(len) in the worst case. Capacities are small
//! (at most 20 in the reference deployment) so the linear scan and shift
//! are kept over a heap or per-class deques; any replacement must still
//! satisfy the [`PriorityStore`] ordering contract.

use std::collections::TryReserveError;

use crate::queue::traits::{Prioritized, PriorityStore};

/// Circular buffer backing the priority queue
#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Allocate a buffer holding up to `capacity` entries
    ///
    /// Reservation failures are reported instead of aborting, so a caller
    /// never ends up with a partially built buffer.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Physical index of the entry `offset` places after the head
    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.slots.len()
    }

    /// Physical index of the logical head
    pub fn head(&self) -> usize {
        self.head
    }

    /// Physical index where the next entry will be written
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Iterate entries in logical (insertion) order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| self.slots[self.physical(offset)].as_ref())
    }

    /// Remove the entry at logical `offset`, preserving the order of the rest
    fn remove_at(&mut self, offset: usize) -> Option<T> {
        let capacity = self.slots.len();
        let index = self.physical(offset);
        let removed = self.slots[index].take();

        if offset == 0 {
            self.head = (self.head + 1) % capacity;
        } else {
            for shift in offset..self.len - 1 {
                let to = self.physical(shift);
                let from = self.physical(shift + 1);
                self.slots[to] = self.slots[from].take();
            }
            self.tail = (self.tail + capacity - 1) % capacity;
        }

        self.len -= 1;
        removed
    }
}

impl<T: Prioritized> RingBuffer<T> {
    /// Logical offset of the highest-priority entry, earliest among ties
    fn highest_offset(&self) -> Option<usize> {
        let mut best: Option<(usize, _)> = None;

        for (offset, entry) in self.iter().enumerate() {
            let priority = entry.priority();
            match best {
                Some((_, current)) if priority <= current => {}
                _ => best = Some((offset, priority)),
            }
        }

        best.map(|(offset, _)| offset)
    }
}

impl<T: Prioritized> PriorityStore<T> for RingBuffer<T> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, entry: T) -> Result<(), T> {
        if self.len == self.slots.len() {
            return Err(entry);
        }

        self.slots[self.tail] = Some(entry);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
        Ok(())
    }

    fn take_highest(&mut self) -> Option<T> {
        let offset = self.highest_offset()?;
        self.remove_at(offset)
    }
}
