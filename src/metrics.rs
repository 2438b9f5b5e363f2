//! Operation counters for [`LruCache`](crate::lru::LruCache).
//!
//! Compiled only with the `metrics` feature. Counters touched from `&self`
//! methods (`peek`) live in a [`MetricsCell`]; the rest are plain `u64`s
//! updated under `&mut self`.

use std::cell::Cell;

/// Single-threaded counter usable from `&self`.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_hits: u64,
    pub get_misses: u64,
    pub peek_calls: MetricsCell,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
}

impl LruMetrics {
    pub fn snapshot(&self, len: usize, capacity: usize) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            peek_calls: self.peek_calls.get(),
            insert_new: self.insert_new,
            insert_updates: self.insert_updates,
            evicted_entries: self.evicted_entries,
            cache_len: len,
            capacity,
        }
    }
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_hits: u64,
    pub get_misses: u64,
    pub peek_calls: u64,

    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,

    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        let total = self.get_hits + self.get_misses;
        if total == 0 {
            0.0
        } else {
            self.get_hits as f64 / total as f64
        }
    }
}
