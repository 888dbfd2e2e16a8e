//! Keyed, cancellable deadlines owned by one session

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::Instant;

/// At most one live deadline per key. Re-arming a key replaces its deadline
/// (last write wins); nothing fires after `clear`.
#[derive(Debug)]
pub struct TimerSet<K> {
    deadlines: HashMap<K, Instant>,
}

impl<K: Hash + Eq + Clone> TimerSet<K> {
    pub fn new() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }

    /// Arm `key`. Returns true if an earlier timer for it was cancelled.
    pub fn arm(&mut self, key: K, deadline: Instant) -> bool {
        self.deadlines.insert(key, deadline).is_some()
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        self.deadlines.remove(key).is_some()
    }

    pub fn deadline(&self, key: &K) -> Option<Instant> {
        self.deadlines.get(key).copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every key whose deadline is at or before `now`
    pub fn drain_due(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            self.deadlines.remove(key);
        }
        due
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
