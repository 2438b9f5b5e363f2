//! Recency-ordered doubly linked list backed by `SlotArena`.
//!
//! Each entry carries its key, its value and the `SlotId` links to its
//! neighbors. Links are handles into the arena, never ownership, so relinking
//! an entry is a handful of handle writes.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Entry<K, V>>)
//!   ┌────────┬──────────────────────────────────────────────────────┐
//!   │ SlotId │ Entry { key, value, prev, next }                     │
//!   ├────────┼──────────────────────────────────────────────────────┤
//!   │ id_1   │ { key: A, value: 1, prev: None,       next: id_2 }   │
//!   │ id_2   │ { key: B, value: 2, prev: Some(id_1), next: id_3 }   │
//!   │ id_3   │ { key: C, value: 3, prev: Some(id_2), next: None }   │
//!   └────────┴──────────────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!            MRU                       LRU
//! ```
//!
//! ## Operations
//! - `detach(id)`: unlink an entry, keeping it allocated
//! - `prepend(id)`: link a detached entry at the head
//! - `move_to_front(id)`: `detach` + `prepend`
//! - `evict_tail()`: unlink and free the tail entry
//!
//! All of the above are O(1). `iter` is O(n).
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Entries ordered from most recently used (head) to least recently used (tail).
#[derive(Debug)]
pub struct RecencyList<K, V> {
    arena: SlotArena<Entry<K, V>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<K, V> RecencyList<K, V> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with slots reserved for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Number of entries owned by the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` names a live entry.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Most recently used entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.head.and_then(|id| self.get(id))
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently used entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<(&K, &V)> {
        self.arena.get(id).map(|entry| (&entry.key, &entry.value))
    }

    pub fn value(&self, id: SlotId) -> Option<&V> {
        self.arena.get(id).map(|entry| &entry.value)
    }

    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.arena.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Iterates entries from head (MRU) to tail (LRU).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len(),
        }
    }

    /// Iterates entry handles from head (MRU) to tail (LRU).
    pub fn iter_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        std::iter::successors(self.head, move |id| {
            self.arena.get(*id).and_then(|entry| entry.next)
        })
    }

    /// Allocates a new entry and links it at the head.
    pub fn push_front(&mut self, key: K, value: V) -> SlotId {
        let id = self.arena.insert(Entry {
            key,
            value,
            prev: None,
            next: None,
        });
        self.prepend(id);
        id
    }

    /// Unlinks `id`, reconnecting its neighbors.
    ///
    /// The entry stays allocated with cleared links and must be linked again
    /// with [`prepend`](Self::prepend) before the list is used otherwise.
    /// Returns `false`, leaving the list untouched, if `id` is not live or is
    /// already detached.
    pub fn detach(&mut self, id: SlotId) -> bool {
        let (prev, next) = match self.arena.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return false,
        };
        if !self.is_linked(id, prev, next) {
            return false;
        }

        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.arena.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_entry) = self.arena.get_mut(next_id) {
                    next_entry.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        if let Some(entry) = self.arena.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
        true
    }

    /// Links a detached entry as the new head.
    ///
    /// Returns `false` if `id` is not live or is still linked.
    pub fn prepend(&mut self, id: SlotId) -> bool {
        let (prev, next) = match self.arena.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return false,
        };
        if self.is_linked(id, prev, next) {
            return false;
        }

        let old_head = self.head;
        if let Some(entry) = self.arena.get_mut(id) {
            entry.next = old_head;
        }

        match old_head {
            Some(old_head) => {
                if let Some(head_entry) = self.arena.get_mut(old_head) {
                    head_entry.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        true
    }

    /// Promotes `id` to the head. Returns `false` if `id` is not a linked entry.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if self.head == Some(id) {
            return true;
        }
        self.detach(id) && self.prepend(id)
    }

    /// An entry is linked when it has a neighbor or is the sole head.
    fn is_linked(&self, id: SlotId, prev: Option<SlotId>, next: Option<SlotId>) -> bool {
        prev.is_some() || next.is_some() || self.head == Some(id)
    }

    /// Unlinks and frees the tail entry, returning its key and value.
    pub fn evict_tail(&mut self) -> Option<(K, V)> {
        let id = self.tail?;
        self.detach(id);
        self.arena
            .remove(id)
            .map(|entry| (entry.key, entry.value))
    }

    /// Slots ever allocated by the backing arena, live or free.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_slot_count(&self) -> usize {
        self.arena.slot_count()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;
        while let Some(id) = current {
            let entry = self.arena.get(id).expect("linked entry missing");
            assert_eq!(entry.prev, prev);
            prev = Some(id);
            current = entry.next;
            count += 1;
            assert!(count <= self.len(), "cycle in recency list");
        }
        assert_eq!(prev, self.tail);
        assert_eq!(count, self.len());

        let mut back_count = 0usize;
        let mut current = self.tail;
        while let Some(id) = current {
            current = self.arena.get(id).expect("linked entry missing").prev;
            back_count += 1;
            assert!(back_count <= self.len(), "cycle in recency list");
        }
        assert_eq!(back_count, count);
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(&K, &V)` from most to least recently used.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let entry = self.list.arena.get(id)?;
        self.current = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
