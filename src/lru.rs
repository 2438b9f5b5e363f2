//! # Fixed-capacity LRU cache
//!
//! ```text
//!   LruCache<K, V, I>
//!
//!   index: I (KeyIndex<K>, default FxHashMap)
//!   ┌─────────┬─────────┐
//!   │  key A  │  id_2   │──────────────────────┐
//!   │  key B  │  id_1   │────────┐             │
//!   └─────────┴─────────┘        ▼             ▼
//!   list: RecencyList<K, V>   head ─► [id_1: B] ◄──► [id_2: A] ◄── tail
//!                                       MRU             LRU
//! ```
//!
//! Every operation consults the index first. A hit promotes the entry to the
//! head of the recency list. Inserting a new key links a fresh entry at the
//! head, indexes it, then evicts from the tail while the cache is over
//! capacity.
//!
//! | Method       | Complexity | Promotes | Notes                              |
//! |--------------|------------|----------|------------------------------------|
//! | `get`        | O(1) avg   | yes      | `None` on miss, no side effects    |
//! | `put`        | O(1) avg   | yes      | updates in place or inserts/evicts |
//! | `peek`       | O(1) avg   | no       |                                    |
//! | `contains`   | O(1) avg   | no       |                                    |
//! | `peek_lru`   | O(1)       | no       | next eviction candidate            |
//! | `iter`       | O(n)       | no       | MRU to LRU                         |
//!
//! ## Zero capacity
//!
//! [`LruCache::new(0)`](LruCache::new) builds a cache that evicts every entry
//! as soon as it is inserted, so it is always empty. Use
//! [`LruCache::try_new`] to reject zero instead.
//!
//! ## Example
//!
//! ```
//! use lrukit::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! // "b" is now least recently used and makes room for "c".
//! cache.put("c", 3);
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.len(), 2);
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::{Iter, RecencyList};
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError};
use crate::index::KeyIndex;
#[cfg(feature = "metrics")]
use crate::metrics::{LruMetrics, LruMetricsSnapshot};

/// Upper bound on the slots and index buckets reserved up front.
///
/// Larger capacities still work; storage grows as entries arrive.
pub const MAX_PREALLOC: usize = 1 << 16;

/// Least-recently-used cache holding at most `capacity` entries.
///
/// `I` is the key index. The default is an `FxHashMap`; any [`KeyIndex`]
/// can be injected with [`with_index`](LruCache::with_index).
pub struct LruCache<K, V, I = FxHashMap<K, SlotId>> {
    list: RecencyList<K, V>,
    index: I,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is accepted; such a cache never retains anything.
    ///
    /// ```
    /// use lrukit::LruCache;
    ///
    /// let cache: LruCache<u64, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        let index =
            FxHashMap::with_capacity_and_hasher(capacity.min(MAX_PREALLOC), Default::default());
        Self::with_index(capacity, index)
    }

    /// Like [`new`](Self::new), but rejects a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        validate_capacity(capacity)?;
        Ok(Self::new(capacity))
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    Ok(())
}

impl<K, V, I> LruCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    /// Creates a cache that looks keys up through `index`.
    ///
    /// Keys already present in `index` are discarded.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use lrukit::LruCache;
    ///
    /// let mut cache = LruCache::with_index(2, BTreeMap::new());
    /// cache.put(3, "three");
    /// assert_eq!(cache.peek(&3), Some(&"three"));
    /// ```
    pub fn with_index(capacity: usize, mut index: I) -> Self {
        index.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity, "lru cache created");

        Self {
            list: RecencyList::with_capacity(capacity.min(MAX_PREALLOC)),
            index,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(id) = self.index.find(key) else {
            #[cfg(feature = "metrics")]
            {
                self.metrics.get_misses += 1;
            }
            return None;
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.get_hits += 1;
        }

        self.list.move_to_front(id);
        self.list.value(id)
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// Updating an existing key replaces its value in place and leaves the
    /// length unchanged. Inserting a new key evicts the least recently used
    /// entry when the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(id) = self.index.find(&key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.insert_updates += 1;
            }

            if let Some(slot) = self.list.value_mut(id) {
                *slot = value;
            }
            self.list.move_to_front(id);
            return;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.insert_new += 1;
        }

        let id = self.list.push_front(key.clone(), value);
        self.index.insert(key, id);
        self.trim();
    }

    /// Evicts from the tail until the cache is within capacity.
    fn trim(&mut self) {
        while self.list.len() > self.capacity {
            let Some((key, _value)) = self.list.evict_tail() else {
                break;
            };
            self.index.remove(&key);

            #[cfg(feature = "metrics")]
            {
                self.metrics.evicted_entries += 1;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(len = self.list.len(), capacity = self.capacity, "evicted lru entry");
        }
    }

    /// Returns the value for `key` without changing recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.peek_calls.incr();

        self.index.find(key).and_then(|id| self.list.value(id))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.find(key).is_some()
    }

    /// The entry that the next insertion of a new key would evict.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back()
    }

    /// The most recently used entry.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.front()
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.capacity)
    }

    /// Checks that the recency list and key index describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.list.len();
        if len > self.capacity {
            return Err(InvariantError::OverCapacity {
                len,
                capacity: self.capacity,
            });
        }
        if self.index.len() != len {
            return Err(InvariantError::IndexLenMismatch {
                index_len: self.index.len(),
                list_len: len,
            });
        }
        if self.list.front_id().is_none() != (len == 0) {
            return Err(InvariantError::HeadMismatch { len });
        }

        let mut walked = 0usize;
        for id in self.list.iter_ids().take(len + 1) {
            walked += 1;
            let (key, _) = self.list.get(id).ok_or(InvariantError::StaleHandle(id))?;
            if self.index.find(key) != Some(id) {
                return Err(InvariantError::Unindexed(id));
            }
        }
        if walked != len {
            return Err(InvariantError::WalkLenMismatch { walked, len });
        }
        Ok(())
    }
}

impl<K, V, I> fmt::Debug for LruCache<K, V, I>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a, K, V>(&'a RecencyList<K, V>);

        impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entries<'_, K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("entries", &Entries(&self.list))
            .finish()
    }
}

impl<'a, K, V, I> IntoIterator for &'a LruCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<I: KeyIndex<&'static str>>(cache: &LruCache<&'static str, i32, I>) -> Vec<&'static str> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: LruCache<i32, i32> = LruCache::new(10);
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
            assert_eq!(cache.peek_lru(), None);
            assert_eq!(cache.peek_mru(), None);
        }

        #[test]
        fn get_miss_has_no_side_effects() {
            let mut cache = LruCache::new(2);
            cache.put("a", 1);
            cache.put("b", 2);
            assert_eq!(cache.get(&"zzz"), None);
            assert_eq!(keys(&cache), vec!["b", "a"]);
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn get_promotes_to_head() {
            let mut cache = LruCache::new(3);
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("c", 3);

            assert_eq!(cache.get(&"a"), Some(&1));
            assert_eq!(keys(&cache), vec!["a", "c", "b"]);
            assert_eq!(cache.peek_lru(), Some((&"b", &2)));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn put_evicts_least_recently_inserted() {
            let mut cache = LruCache::new(3);
            cache.put("A", 1);
            cache.put("B", 2);
            cache.put("C", 3);
            cache.put("D", 4);

            assert_eq!(cache.get(&"A"), None);
            assert_eq!(cache.get(&"B"), Some(&2));
            assert_eq!(cache.get(&"C"), Some(&3));
            assert_eq!(cache.get(&"D"), Some(&4));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn get_refresh_changes_eviction_victim() {
            let mut cache = LruCache::new(3);
            cache.put("A", 1);
            cache.put("B", 2);
            cache.put("C", 3);
            cache.get(&"A");
            cache.put("D", 4);

            assert_eq!(cache.get(&"B"), None);
            assert_eq!(cache.get(&"A"), Some(&1));
            assert_eq!(cache.get(&"C"), Some(&3));
            assert_eq!(cache.get(&"D"), Some(&4));
        }

        #[test]
        fn put_existing_updates_in_place() {
            let mut cache = LruCache::new(3);
            cache.put("A", 1);
            cache.put("A", 2);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&"A"), Some(&2));
        }

        #[test]
        fn put_existing_promotes_without_eviction() {
            let mut cache = LruCache::new(2);
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("a", 10);

            assert_eq!(keys(&cache), vec!["a", "b"]);
            cache.put("c", 3);
            assert!(!cache.contains(&"b"));
            assert_eq!(cache.peek(&"a"), Some(&10));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn repeated_get_is_idempotent() {
            let mut cache = LruCache::new(2);
            cache.put("a", 1);
            cache.put("b", 2);
            for _ in 0..5 {
                assert_eq!(cache.get(&"b"), Some(&2));
                assert_eq!(cache.len(), 2);
            }
            assert_eq!(cache.peek_mru(), Some((&"b", &2)));
        }

        #[test]
        fn peek_does_not_promote() {
            let mut cache = LruCache::new(2);
            cache.put("a", 1);
            cache.put("b", 2);
            assert_eq!(cache.peek(&"a"), Some(&1));
            cache.put("c", 3);
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn debug_lists_entries_in_recency_order() {
            let mut cache = LruCache::new(2);
            cache.put("a", 1);
            cache.put("b", 2);
            let dbg = format!("{cache:?}");
            assert!(dbg.contains("capacity: 2"));
            assert!(dbg.contains(r#"{"b": 2, "a": 1}"#));
        }
    }

    // ==============================================
    // EDGE CASES
    // ==============================================
    mod edge_cases {
        use super::*;

        #[test]
        fn zero_capacity_stays_empty() {
            let mut cache = LruCache::new(0);
            cache.put("a", 1);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.get(&"a"), None);
            assert!(!cache.contains(&"a"));
            cache.check_invariants().unwrap();

            cache.put("a", 2);
            assert!(cache.is_empty());
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LruCache::<u8, u8>::try_new(0).unwrap_err();
            assert_eq!(err, ConfigError::ZeroCapacity);
            assert_eq!(err.to_string(), "capacity must be > 0");
            assert!(LruCache::<u8, u8>::try_new(1).is_ok());
        }

        #[test]
        fn capacity_one_keeps_latest() {
            let mut cache = LruCache::new(1);
            cache.put("a", 1);
            cache.put("b", 2);
            assert_eq!(cache.get(&"a"), None);
            assert_eq!(cache.get(&"b"), Some(&2));
            assert_eq!(cache.get(&"b"), Some(&2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn with_index_discards_existing_keys() {
            let mut index: FxHashMap<&str, SlotId> = FxHashMap::default();
            index.insert("ghost", SlotId(42));
            let cache: LruCache<&str, i32, _> = LruCache::with_index(2, index);
            assert!(!cache.contains(&"ghost"));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn btree_index_behaves_like_hash_index() {
            let mut cache = LruCache::with_index(2, std::collections::BTreeMap::new());
            cache.put("a", 1);
            cache.put("b", 2);
            cache.get(&"a");
            cache.put("c", 3);
            assert_eq!(keys(&cache), vec!["c", "a"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn evicted_slots_are_reused() {
            let mut cache = LruCache::new(2);
            for i in 0..100 {
                cache.put(i, i);
            }
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.list.debug_slot_count(), 2);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn huge_capacity_does_not_preallocate() {
            let mut cache = LruCache::new(usize::MAX);
            assert_eq!(cache.capacity(), usize::MAX);
            cache.put("a", 1);
            cache.put("b", 2);
            assert_eq!(cache.get(&"a"), Some(&1));
            assert_eq!(cache.len(), 2);
            cache.check_invariants().unwrap();

            let mut cache = LruCache::with_index(usize::MAX, std::collections::BTreeMap::new());
            cache.put(1u64, "one");
            assert_eq!(cache.get(&1), Some(&"one"));
        }

        #[test]
        fn capacity_above_prealloc_bound_still_fills() {
            let capacity = MAX_PREALLOC + 8;
            let mut cache = LruCache::new(capacity);
            for i in 0..capacity + 1 {
                cache.put(i, i);
            }
            assert_eq!(cache.len(), capacity);
            assert!(!cache.contains(&0));
            assert_eq!(cache.peek_lru(), Some((&1, &1)));
        }
    }

    // ==============================================
    // INJECTED INDEX
    // ==============================================
    mod injected_index {
        use super::*;
        use std::collections::HashMap;

        /// Index that records every call it receives.
        #[derive(Default)]
        struct RecordingIndex {
            map: HashMap<&'static str, SlotId>,
            finds: usize,
            inserts: usize,
            removes: Vec<&'static str>,
        }

        impl KeyIndex<&'static str> for RecordingIndex {
            fn find(&self, key: &&'static str) -> Option<SlotId> {
                self.map.get(key).copied()
            }

            fn insert(&mut self, key: &'static str, id: SlotId) -> Option<SlotId> {
                self.inserts += 1;
                self.map.insert(key, id)
            }

            fn remove(&mut self, key: &&'static str) -> Option<SlotId> {
                self.removes.push(*key);
                self.map.remove(key)
            }

            fn len(&self) -> usize {
                self.map.len()
            }

            fn clear(&mut self) {
                self.map.clear();
            }
        }

        #[test]
        fn eviction_removes_exactly_the_victim_key() {
            let mut cache = LruCache::with_index(2, RecordingIndex::default());
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("a", 3);
            cache.put("c", 4);

            assert_eq!(cache.index.inserts, 3);
            assert_eq!(cache.index.removes, vec!["b"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn zero_capacity_indexes_then_removes() {
            let mut cache = LruCache::with_index(0, RecordingIndex::default());
            cache.put("a", 1);
            assert_eq!(cache.index.inserts, 1);
            assert_eq!(cache.index.removes, vec!["a"]);
            assert!(cache.index.map.is_empty());
        }

        #[test]
        fn invariant_check_detects_desync() {
            let mut cache = LruCache::with_index(2, RecordingIndex::default());
            cache.put("a", 1);
            cache.index.map.remove("a");
            let err = cache.check_invariants().unwrap_err();
            assert_eq!(
                err,
                InvariantError::IndexLenMismatch {
                    index_len: 0,
                    list_len: 1
                }
            );
            assert!(err.to_string().contains("index has 0 keys"));
        }

        #[test]
        fn invariant_check_detects_misindexed_key() {
            let mut cache = LruCache::with_index(2, RecordingIndex::default());
            cache.put("a", 1);
            cache.put("b", 2);
            let a = cache.index.map["a"];
            let b = cache.index.map["b"];
            cache.index.map.insert("a", b);
            let err = cache.check_invariants().unwrap_err();
            assert_eq!(err, InvariantError::Unindexed(a));
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_track_operations() {
            let mut cache = LruCache::new(1);
            cache.put("a", 1);
            cache.put("a", 2);
            cache.put("b", 3);
            cache.get(&"a");
            cache.get(&"b");
            cache.peek(&"b");

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_new, 2);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.peek_calls, 1);
            assert_eq!(snap.cache_len, 1);
        }
    }

    // ==============================================
    // PROPERTY TESTS
    // ==============================================
    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Debug, Clone)]
        enum Op {
            Put(u8, u32),
            Get(u8),
            Peek(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..24, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
                (0u8..24).prop_map(Op::Get),
                (0u8..24).prop_map(Op::Peek),
            ]
        }

        /// Reference model: MRU at the front.
        fn model_touch(model: &mut VecDeque<(u8, u32)>, key: u8) -> Option<u32> {
            let pos = model.iter().position(|(k, _)| *k == key)?;
            let entry = model.remove(pos)?;
            model.push_front(entry);
            Some(entry.1)
        }

        proptest! {
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_matches_reference_model(
                capacity in 0usize..12,
                ops in prop::collection::vec(op_strategy(), 0..200)
            ) {
                let mut cache: LruCache<u8, u32> = LruCache::new(capacity);
                let mut model: VecDeque<(u8, u32)> = VecDeque::new();

                for op in ops {
                    match op {
                        Op::Put(k, v) => {
                            cache.put(k, v);
                            if model_touch(&mut model, k).is_some() {
                                model[0].1 = v;
                            } else {
                                model.push_front((k, v));
                                while model.len() > capacity {
                                    model.pop_back();
                                }
                            }
                        },
                        Op::Get(k) => {
                            let expected = model_touch(&mut model, k);
                            prop_assert_eq!(cache.get(&k).copied(), expected);
                        },
                        Op::Peek(k) => {
                            let expected = model.iter().find(|(mk, _)| *mk == k).map(|(_, v)| *v);
                            prop_assert_eq!(cache.peek(&k).copied(), expected);
                        },
                    }

                    let actual: Vec<(u8, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                    let expected: Vec<(u8, u32)> = model.iter().copied().collect();
                    prop_assert_eq!(actual, expected);
                    prop_assert!(cache.check_invariants().is_ok());
                }
            }

            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_len_never_exceeds_capacity(
                capacity in 0usize..30,
                keys in prop::collection::vec(0u32..100, 0..200)
            ) {
                let mut cache: LruCache<u32, u32> = LruCache::new(capacity);
                for k in keys {
                    cache.put(k, k);
                    prop_assert!(cache.len() <= capacity);
                }
            }

            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_touched_key_is_mru(
                keys in prop::collection::vec(0u32..16, 1..100)
            ) {
                let mut cache: LruCache<u32, u32> = LruCache::new(8);
                for k in keys {
                    if cache.get(&k).is_none() {
                        cache.put(k, k * 2);
                    }
                    prop_assert_eq!(cache.peek_mru(), Some((&k, &(k * 2))));
                }
            }
        }
    }
}
