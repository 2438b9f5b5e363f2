//! lrukit: a fixed-capacity least-recently-used cache.
//!
//! The cache pairs a [`RecencyList`] (entries in a slot arena, linked by
//! `SlotId`) with a pluggable [`KeyIndex`]. See [`lru`] for the operation
//! table and eviction rules.

pub mod builder;
pub mod ds;
pub mod error;
pub mod index;
pub mod lru;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::index::KeyIndex;
pub use crate::lru::LruCache;
#[cfg(feature = "metrics")]
pub use crate::metrics::LruMetricsSnapshot;
