//! Tickets for in-flight work keyed by the record they will update.
//!
//! A ticket is live until it is redeemed, invalidated, or superseded by a
//! newer ticket for the same key. Only a live ticket may apply its result.

use std::collections::HashMap;
use std::hash::Hash;

/// Proof that a task was started for `key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket<K> {
    key: K,
    epoch: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What happened when a finished task reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result was written to its record.
    Applied,
    /// The task failed; its record shows the failure.
    Failed,
    /// The record was removed or the task superseded; nothing changed.
    Stale,
}

#[derive(Debug)]
pub struct TaskRegistry<K> {
    next_epoch: u64,
    live: HashMap<K, u64>,
}

impl<K> Default for TaskRegistry<K> {
    fn default() -> Self {
        Self {
            next_epoch: 0,
            live: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> TaskRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task for `key`, superseding any live ticket for it.
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.live.insert(key.clone(), epoch);
        Ticket { key, epoch }
    }

    /// Drop the live ticket for `key`. Returns whether one existed.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.live.remove(key).is_some()
    }

    /// Drop every live ticket.
    pub fn invalidate_all(&mut self) {
        self.live.clear();
    }

    /// Consume `ticket` if it is the live one for its key.
    pub fn redeem(&mut self, ticket: &Ticket<K>) -> bool {
        if self.is_live(ticket) {
            self.live.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    pub fn is_live(&self, ticket: &Ticket<K>) -> bool {
        self.live.get(&ticket.key) == Some(&ticket.epoch)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    /// Number of keys with a live ticket.
    pub fn in_flight(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_once() {
        let mut registry = TaskRegistry::new();
        let ticket = registry.issue("a");
        assert!(registry.redeem(&ticket));
        assert!(!registry.redeem(&ticket));
        assert_eq!(registry.in_flight(), 0);
    }

    #[test]
    fn test_reissue_supersedes() {
        let mut registry = TaskRegistry::new();
        let first = registry.issue("a");
        let second = registry.issue("a");
        assert!(second.epoch() > first.epoch());
        assert!(!registry.redeem(&first));
        assert!(registry.redeem(&second));
    }

    #[test]
    fn test_invalidate_only_touches_its_key() {
        let mut registry = TaskRegistry::new();
        let a = registry.issue("a");
        let b = registry.issue("b");
        assert!(registry.invalidate(&"b"));
        assert!(!registry.invalidate(&"b"));
        assert!(!registry.redeem(&b));
        assert!(registry.redeem(&a));
    }

    #[test]
    fn test_invalidate_all() {
        let mut registry = TaskRegistry::new();
        let a = registry.issue(1);
        registry.issue(2);
        registry.invalidate_all();
        assert!(!registry.is_pending(&2));
        assert!(!registry.redeem(&a));
    }
}
