//! Fixed-capacity newest-first log shared by the activity feed and insight list.

use std::collections::VecDeque;

/// Newest-first log that silently drops its oldest entries past `capacity`.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// A zero capacity is bumped to one so the newest entry is always visible.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting from the back once over capacity.
    ///
    /// Returns the number of entries evicted (0 or 1).
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push_front(entry);
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
            evicted += 1;
        }
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Owned copy of the log, newest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}
