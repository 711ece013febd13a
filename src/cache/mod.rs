//! Snapshot cache
//!
//! Holds the last known full state of each live message so later deletes and
//! edits can be correlated. Entries are `Arc`s and are always replaced
//! wholesale, so a reader never sees a half-written snapshot.
//!
//! The cache is bounded. When full, the entry created longest ago is evicted;
//! replacing an existing id on an edit does not refresh its position. A message
//! evicted this way can no longer be correlated when it is later deleted.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::types::MessageSnapshot;

/// Bounded map of message id to last observed snapshot
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    entries: HashMap<String, Arc<MessageSnapshot>>,
    /// Ids in creation order, oldest at the front
    order: VecDeque<String>,
    capacity: usize,
}

impl SnapshotCache {
    /// Create an empty cache. A zero capacity is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Store a snapshot under its id, overwriting any previous one
    ///
    /// Returns the id evicted to make room, if any.
    pub fn put(&mut self, snapshot: MessageSnapshot) -> Option<String> {
        let id = snapshot.id.clone();
        if self.entries.insert(id.clone(), Arc::new(snapshot)).is_some() {
            return None;
        }

        self.order.push_back(id);
        if self.entries.len() > self.capacity {
            let evicted = self.order.pop_front()?;
            self.entries.remove(&evicted);
            debug!(message_id = %evicted, "Evicted oldest cached snapshot");
            return Some(evicted);
        }
        None
    }

    pub fn get(&self, id: &str) -> Option<Arc<MessageSnapshot>> {
        self.entries.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, keeping the most recently created entries
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }
}
