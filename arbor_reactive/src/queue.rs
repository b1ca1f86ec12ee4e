// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicating pending-re-render queue.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::sink::InvalidationSink;

/// A deduplicating queue of components awaiting re-render.
///
/// Marking a component that is already pending is a no-op, so a component
/// that mutates many reactive members between render passes is re-rendered
/// once. [`drain`](Self::drain) yields pending components in first-marked
/// order and leaves the queue empty.
///
/// A generation counter increments on every mutation; render passes can use
/// it to detect whether the queue changed since a previous observation.
///
/// # Type Parameters
///
/// - `K`: The component instance key. Must be `Copy + Eq + Hash`.
///
/// # Example
///
/// ```rust
/// use arbor_reactive::{InvalidationSink, RenderQueue};
///
/// let mut queue = RenderQueue::<u32>::new();
///
/// queue.invalidate(1);
/// queue.invalidate(2);
/// queue.invalidate(1);
///
/// assert!(queue.is_pending(1));
/// assert_eq!(queue.len(), 2);
///
/// let order: Vec<_> = queue.drain().collect();
/// assert_eq!(order, vec![1, 2]);
/// assert!(!queue.is_pending(1));
/// ```
#[derive(Debug, Clone)]
pub struct RenderQueue<K>
where
    K: Copy + Eq + Hash,
{
    /// Pending keys in first-marked order.
    pending: Vec<K>,
    /// Membership set mirroring `pending`.
    seen: HashSet<K>,
    /// Incremented on every mutation.
    generation: u64,
}

impl<K> Default for RenderQueue<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RenderQueue<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            seen: HashSet::new(),
            generation: 0,
        }
    }

    /// Returns the current generation.
    ///
    /// The generation is incremented on every mutation (mark, drain, clear).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a component as pending re-render.
    ///
    /// Returns `true` if the key was newly enqueued, `false` if it was
    /// already pending.
    pub fn mark(&mut self, key: K) -> bool {
        self.generation = self.generation.wrapping_add(1);
        if self.seen.insert(key) {
            self.pending.push(key);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the key is pending re-render.
    #[must_use]
    pub fn is_pending(&self, key: K) -> bool {
        self.seen.contains(&key)
    }

    /// Returns the number of pending components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no components are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns an iterator over pending keys in first-marked order.
    ///
    /// This does not clear the queue. Use [`drain`](Self::drain) to consume.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.pending.iter().copied()
    }

    /// Drains pending keys in first-marked order, emptying the queue.
    pub fn drain(&mut self) -> impl Iterator<Item = K> + '_ {
        self.generation = self.generation.wrapping_add(1);
        self.seen.clear();
        self.pending.drain(..)
    }

    /// Discards all pending keys.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.seen.clear();
        self.pending.clear();
    }
}

impl<K> InvalidationSink<K> for RenderQueue<K>
where
    K: Copy + Eq + Hash,
{
    fn invalidate(&mut self, key: K) {
        self.mark(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn mark_and_query() {
        let mut queue = RenderQueue::<u32>::new();
        assert!(queue.is_empty());
        assert!(!queue.is_pending(1));

        assert!(queue.mark(1));
        assert!(queue.is_pending(1));
        assert_eq!(queue.len(), 1);

        // Marking again coalesces.
        assert!(!queue.mark(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_preserves_first_marked_order() {
        let mut queue = RenderQueue::<u32>::new();
        queue.mark(5);
        queue.mark(2);
        queue.mark(9);
        queue.mark(2);

        let order: Vec<_> = queue.drain().collect();
        assert_eq!(order, vec![5, 2, 9]);
        assert!(queue.is_empty());
        assert!(!queue.is_pending(5));
    }

    #[test]
    fn remark_after_drain() {
        let mut queue = RenderQueue::<u32>::new();
        queue.mark(1);
        let _ = queue.drain().count();

        // A drained key can be enqueued again.
        assert!(queue.mark(1));
        assert!(queue.is_pending(1));
    }

    #[test]
    fn clear_discards_pending() {
        let mut queue = RenderQueue::<u32>::new();
        queue.mark(1);
        queue.mark(2);

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.is_pending(2));
    }

    #[test]
    fn generation_increments() {
        let mut queue = RenderQueue::<u32>::new();
        let initial = queue.generation();

        queue.mark(1);
        assert_eq!(queue.generation(), initial + 1);

        // Coalesced marks still count as mutations.
        queue.mark(1);
        assert_eq!(queue.generation(), initial + 2);

        let _ = queue.drain().count();
        assert_eq!(queue.generation(), initial + 3);
    }

    #[test]
    fn iter_does_not_consume() {
        let mut queue = RenderQueue::<u32>::new();
        queue.mark(3);
        queue.mark(4);

        let keys: Vec<_> = queue.iter().collect();
        assert_eq!(keys, vec![3, 4]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn sink_impl_marks() {
        let mut queue = RenderQueue::<u32>::new();
        InvalidationSink::invalidate(&mut queue, 8);
        assert!(queue.is_pending(8));
    }
}
