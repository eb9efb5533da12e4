//! Indexed binary min-heap.
//!
//! Unlike `std::collections::BinaryHeap`, every element's current slot in
//! the backing array is tracked, so membership tests are O(1) and an element
//! whose priority changed can be re-sifted in place in O(log n) instead of
//! being pushed again as a stale duplicate.
//!
//! Layout is 0-indexed: parent = (i-1)/2, children = 2i+1, 2i+2.

use crate::error::HeapError;

/// An element that can be stored in an [`IndexedHeap`].
///
/// `key_index` must be small and dense: the heap keeps a slot table indexed
/// by it. Two distinct keys that are live in the same heap must not share a
/// `key_index`.
pub trait HeapKey: Copy + Eq {
    fn key_index(&self) -> usize;
}

impl HeapKey for usize {
    #[inline]
    fn key_index(&self) -> usize {
        *self
    }
}

impl HeapKey for u32 {
    #[inline]
    fn key_index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone)]
struct Entry<K, P> {
    key: K,
    priority: P,
}

/// A min-priority queue over keys `K` ordered by priorities `P`.
#[derive(Debug, Clone)]
pub struct IndexedHeap<K, P> {
    entries: Vec<Entry<K, P>>,
    // key_index -> slot in `entries`
    slots: Vec<Option<usize>>,
}

impl<K: HeapKey, P: Ord> Default for IndexedHeap<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: HeapKey, P: Ord> IndexedHeap<K, P> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Create an empty heap with room for keys whose `key_index` is below
    /// `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: vec![None; capacity],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every element. Runs in O(len), not O(capacity).
    pub fn clear(&mut self) {
        for e in self.entries.drain(..) {
            self.slots[e.key.key_index()] = None;
        }
    }

    /// Whether `key` is currently in the heap.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.heap_index(key).is_some()
    }

    /// Current slot of `key` in the backing array.
    #[inline]
    pub fn heap_index(&self, key: K) -> Option<usize> {
        let slot = (*self.slots.get(key.key_index())?)?;
        match self.entries.get(slot) {
            Some(e) if e.key == key => Some(slot),
            _ => None,
        }
    }

    /// Current priority of `key`, if present.
    pub fn priority(&self, key: K) -> Option<&P> {
        self.heap_index(key).map(|slot| &self.entries[slot].priority)
    }

    /// The minimum element without removing it.
    pub fn peek(&self) -> Option<(K, &P)> {
        self.entries.first().map(|e| (e.key, &e.priority))
    }

    /// Insert `key` with `priority`.
    ///
    /// Fails with [`HeapError::DuplicateInsert`] if `key` is already present.
    pub fn insert(&mut self, key: K, priority: P) -> Result<(), HeapError> {
        let ki = key.key_index();
        if self.contains(key) {
            return Err(HeapError::DuplicateInsert(ki));
        }
        if ki >= self.slots.len() {
            self.slots.resize(ki + 1, None);
        }
        let slot = self.entries.len();
        self.entries.push(Entry { key, priority });
        self.slots[ki] = Some(slot);
        self.sift_up(slot);
        Ok(())
    }

    /// Remove and return the minimum element.
    ///
    /// Fails with [`HeapError::Empty`] if the heap is empty.
    pub fn extract_min(&mut self) -> Result<(K, P), HeapError> {
        if self.entries.is_empty() {
            return Err(HeapError::Empty);
        }
        let last = self.entries.len() - 1;
        self.swap_entries(0, last);
        let entry = self.entries.pop().ok_or(HeapError::Empty)?;
        self.slots[entry.key.key_index()] = None;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.key, entry.priority))
    }

    /// Replace the priority of a contained `key` and restore heap order
    /// from its current slot.
    ///
    /// A lowered priority sifts up; a raised one sifts down.
    /// Fails with [`HeapError::Missing`] if `key` is not present.
    pub fn resift(&mut self, key: K, priority: P) -> Result<(), HeapError> {
        let slot = self
            .heap_index(key)
            .ok_or(HeapError::Missing(key.key_index()))?;
        self.entries[slot].priority = priority;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
        Ok(())
    }

    /// Drain the heap in ascending priority order.
    pub fn into_sorted_vec(mut self) -> Vec<(K, P)> {
        let mut out = Vec::with_capacity(self.entries.len());
        while let Ok(item) = self.extract_min() {
            out.push(item);
        }
        out
    }

    /// O(n) check of the heap order and the slot table. Intended for tests
    /// and debug assertions.
    pub fn check_invariant(&self) -> bool {
        let ordered = (1..self.entries.len())
            .all(|i| self.entries[(i - 1) / 2].priority <= self.entries[i].priority);
        let indexed = self
            .entries
            .iter()
            .enumerate()
            .all(|(slot, e)| self.slots.get(e.key.key_index()) == Some(&Some(slot)));
        ordered && indexed
    }

    // Returns the slot the element ended in.
    fn sift_up(&mut self, mut idx: usize) -> usize {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx].priority < self.entries[parent].priority {
                self.swap_entries(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
        idx
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && self.entries[left].priority < self.entries[smallest].priority {
                smallest = left;
            }
            if right < len && self.entries[right].priority < self.entries[smallest].priority {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap_entries(idx, smallest);
            idx = smallest;
        }
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots[self.entries[a].key.key_index()] = Some(a);
        self.slots[self.entries[b].key.key_index()] = Some(b);
    }
}
