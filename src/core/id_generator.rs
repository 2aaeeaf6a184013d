//! Monotonic account id generation
//!
//! A single atomic counter shared by every creator. `fetch_add` hands each
//! caller a distinct value, so concurrent creates never block each other and
//! never receive the same id.

use crate::types::AccountId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Strictly increasing id source starting at 0
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first id is 0
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Take the next id
    pub fn next_id(&self) -> AccountId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Rewind to 0
    ///
    /// Requires exclusive access, so no id can be handed out concurrently.
    pub fn reset(&mut self) {
        *self.next.get_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_start_at_zero_and_increase() {
        let ids = IdGenerator::new();

        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn test_reset_rewinds_to_zero() {
        let mut ids = IdGenerator::new();
        ids.next_id();
        ids.next_id();

        ids.reset();

        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = Arc::new(IdGenerator::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let ids_clone = Arc::clone(&ids);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| ids_clone.next_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {} handed out twice", id);
            }
        }

        // No value is skipped either
        assert_eq!(seen.len(), 8000);
        assert!(seen.iter().all(|&id| id < 8000));
    }
}
