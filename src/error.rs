//! Error types for lrukit.
//!
//! - [`ConfigError`]: a strict constructor was given a capacity it rejects.
//! - [`InvariantError`]: `check_invariants` found the recency list and key
//!   index out of step. Each variant carries the counts or handle involved.
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::LruCache;
//!
//! let cache: Result<LruCache<u64, String>, ConfigError> = LruCache::try_new(16);
//! assert!(cache.is_ok());
//!
//! let bad = LruCache::<u64, String>::try_new(0);
//! assert_eq!(bad.unwrap_err(), ConfigError::ZeroCapacity);
//! ```

use std::fmt;

use crate::ds::slot_arena::SlotId;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// A broken link between the recency list and the key index.
///
/// Produced by [`LruCache::check_invariants`](crate::lru::LruCache::check_invariants).
/// The first failed check wins; later checks are not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// The list holds more entries than the cache capacity.
    OverCapacity { len: usize, capacity: usize },
    /// The index and the list disagree on the number of entries.
    IndexLenMismatch { index_len: usize, list_len: usize },
    /// The list has a head while empty, or no head while non-empty.
    HeadMismatch { len: usize },
    /// A handle reached by walking the list names no live entry.
    StaleHandle(SlotId),
    /// The index does not map the entry's key back to its handle.
    Unindexed(SlotId),
    /// Walking from the head reached a different count than `len`.
    WalkLenMismatch { walked: usize, len: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OverCapacity { len, capacity } => {
                write!(f, "len {len} exceeds capacity {capacity}")
            },
            Self::IndexLenMismatch { index_len, list_len } => {
                write!(f, "index has {index_len} keys but list has {list_len} entries")
            },
            Self::HeadMismatch { len } => {
                write!(f, "head presence inconsistent with len {len}")
            },
            Self::StaleHandle(id) => write!(f, "stale slot {} in list", id.index()),
            Self::Unindexed(id) => {
                write!(f, "entry at slot {} is not indexed under its key", id.index())
            },
            Self::WalkLenMismatch { walked, len } => {
                write!(f, "walked {walked} entries from head but len = {len}")
            },
        }
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LruCache::try_new`](crate::lru::LruCache::try_new) and
/// [`LruBuilder::try_build`](crate::builder::LruBuilder::try_build).
///
/// ```
/// use lrukit::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Capacity 0 through a strict constructor.
    ZeroCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => f.write_str("capacity must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}
