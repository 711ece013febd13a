//! Bounded retention log
//!
//! A newest-first history with a fixed capacity. Inserting past capacity
//! evicts exactly one entry from the tail. [`RetentionLog::resize`] drops
//! the oldest entries that no longer fit.

use std::collections::VecDeque;

/// Capacity-bounded, newest-first log of records
#[derive(Debug, Clone)]
pub struct RetentionLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> RetentionLog<T> {
    /// Create an empty log. A zero capacity is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Prepend an entry, returning the evicted tail entry if the bound was exceeded
    pub fn record(&mut self, entry: T) -> Option<T> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Number of entries currently held
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Change the capacity, keeping the newest entries that fit
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }
}

impl<T: Clone> RetentionLog<T> {
    /// Copy of the first `min(n, count)` entries, newest first
    pub fn recent(&self, n: usize) -> Vec<T> {
        self.entries.iter().take(n).cloned().collect()
    }
}
