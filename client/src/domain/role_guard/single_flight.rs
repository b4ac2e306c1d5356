//! Per-key single-flight gate.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

/// Admits at most one holder per key at a time.
#[derive(Debug)]
pub(crate) struct SingleFlight<K> {
    active: Mutex<HashSet<K>>,
}

impl<K> Default for SingleFlight<K> {
    fn default() -> Self {
        Self {
            active: Mutex::new(HashSet::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> SingleFlight<K> {
    /// Claim `key`, or return `None` while another holder has it.
    pub(crate) fn try_acquire(&self, key: K) -> Option<FlightPermit<'_, K>> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            return None;
        }
        Some(FlightPermit { gate: self, key })
    }

    pub(crate) fn is_active(&self, key: &K) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn release(&self, key: &K) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Releases its key when dropped, including when the owning future is
/// cancelled.
#[derive(Debug)]
pub(crate) struct FlightPermit<'a, K: Eq + Hash + Clone> {
    gate: &'a SingleFlight<K>,
    key: K,
}

impl<K: Eq + Hash + Clone> Drop for FlightPermit<'_, K> {
    fn drop(&mut self) {
        self.gate.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_for_same_key_is_refused() {
        let gate = SingleFlight::default();
        let permit = gate.try_acquire("u_1");
        assert!(permit.is_some());
        assert!(gate.try_acquire("u_1").is_none());
        assert!(gate.try_acquire("u_2").is_some());
    }

    #[test]
    fn dropping_permit_reopens_key() {
        let gate = SingleFlight::default();
        drop(gate.try_acquire("u_1"));
        assert!(!gate.is_active(&"u_1"));
        assert!(gate.try_acquire("u_1").is_some());
    }
}
