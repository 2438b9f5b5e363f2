//! Key lookup backends for the LRU cache.
//!
//! The cache keeps recency order in a [`RecencyList`](crate::ds::RecencyList)
//! and finds entries through a [`KeyIndex`] mapping each key to the `SlotId`
//! of its entry. Any map with amortized O(1) (or O(log n)) insert, find and
//! remove can serve as the index; implementations are provided for
//! `HashMap` with any hasher and for `BTreeMap`.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::ds::slot_arena::SlotId;

/// Key → entry handle lookup used by the cache.
pub trait KeyIndex<K> {
    /// Returns the handle stored for `key`.
    fn find(&self, key: &K) -> Option<SlotId>;

    /// Maps `key` to `id`, returning the previous handle if any.
    fn insert(&mut self, key: K, id: SlotId) -> Option<SlotId>;

    /// Removes `key`, returning its handle.
    fn remove(&mut self, key: &K) -> Option<SlotId>;

    /// Number of keys indexed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every key.
    fn clear(&mut self);
}

impl<K, S> KeyIndex<K> for HashMap<K, SlotId, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn find(&self, key: &K) -> Option<SlotId> {
        self.get(key).copied()
    }

    #[inline]
    fn insert(&mut self, key: K, id: SlotId) -> Option<SlotId> {
        HashMap::insert(self, key, id)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> Option<SlotId> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }
}

impl<K> KeyIndex<K> for BTreeMap<K, SlotId>
where
    K: Ord,
{
    fn find(&self, key: &K) -> Option<SlotId> {
        self.get(key).copied()
    }

    fn insert(&mut self, key: K, id: SlotId) -> Option<SlotId> {
        BTreeMap::insert(self, key, id)
    }

    fn remove(&mut self, key: &K) -> Option<SlotId> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }
}
