//! Builder for [`LruCache`] instances.
//!
//! ```rust
//! use lrukit::builder::LruBuilder;
//!
//! let mut cache = LruBuilder::new(100).try_build::<u64, String>().unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::index::KeyIndex;
use crate::lru::{LruCache, validate_capacity};

/// Collects cache configuration before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruBuilder {
    capacity: usize,
}

impl LruBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Overrides the capacity given to [`new`](Self::new).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a cache with the default index. Zero capacity is accepted.
    pub fn build<K, V>(self) -> LruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        LruCache::new(self.capacity)
    }

    /// Builds a cache with the default index, rejecting zero capacity.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        LruCache::try_new(self.capacity)
    }

    /// Builds a cache that looks keys up through `index`.
    pub fn build_with_index<K, V, I>(self, index: I) -> LruCache<K, V, I>
    where
        K: Clone,
        I: KeyIndex<K>,
    {
        LruCache::with_index(self.capacity, index)
    }

    /// Like [`build_with_index`](Self::build_with_index), rejecting zero capacity.
    pub fn try_build_with_index<K, V, I>(self, index: I) -> Result<LruCache<K, V, I>, ConfigError>
    where
        K: Clone,
        I: KeyIndex<K>,
    {
        validate_capacity(self.capacity)?;
        Ok(LruCache::with_index(self.capacity, index))
    }
}
