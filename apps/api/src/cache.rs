//! Bounded concurrent memo shared by the geometry and contrast caches.

use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Memoizes pure computations keyed by their (already clamped) inputs.
///
/// Once `capacity` entries are held, further results are computed but not
/// stored. Templates are static for the process lifetime, so nothing is ever
/// invalidated. A slot is reserved before inserting, so concurrent misses
/// cannot push the map past `capacity`.
pub struct BoundedMemo<K, V> {
    entries: DashMap<K, V>,
    reserved: AtomicUsize,
    capacity: usize,
}

impl<K, V> BoundedMemo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            reserved: AtomicUsize::new(0),
            capacity: capacity.max(1),
        }
    }

    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.entries.get(&key) {
            return hit.value().clone();
        }

        let value = compute();
        if !self.reserve_slot() {
            return value;
        }

        match self.entries.entry(key) {
            Entry::Occupied(existing) => {
                // another caller stored the same key first
                self.reserved.fetch_sub(1, Ordering::AcqRel);
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
                value
            }
        }
    }

    fn reserve_slot(&self) -> bool {
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |held| {
                (held < self.capacity).then_some(held + 1)
            })
            .is_ok()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            entries: self.entries.len(),
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MemoStats {
    pub entries: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hit_skips_compute() {
        let memo = BoundedMemo::new(4);
        let calls = Cell::new(0);
        for _ in 0..3 {
            let v = memo.get_or_insert_with("k", || {
                calls.set(calls.get() + 1);
                7
            });
            assert_eq!(v, 7);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let memo = BoundedMemo::new(3);
        for i in 0..10 {
            assert_eq!(memo.get_or_insert_with(i, || i * 2), i * 2);
            assert!(memo.stats().entries <= 3);
        }
        assert!(memo.contains(&2));
        assert!(!memo.contains(&9));
    }

    #[test]
    fn test_concurrent_misses_respect_capacity() {
        let memo = std::sync::Arc::new(BoundedMemo::new(5));
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let memo = memo.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let key = (worker * 50 + i) % 40;
                        assert_eq!(memo.get_or_insert_with(key, || key + 1), key + 1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(memo.stats().entries, 5);
    }

    #[test]
    fn test_zero_capacity_still_works() {
        let memo = BoundedMemo::new(0);
        assert_eq!(memo.get_or_insert_with(1, || 1), 1);
        assert_eq!(memo.stats().capacity, 1);
    }
}
