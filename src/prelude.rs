pub use crate::builder::LruBuilder;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::index::KeyIndex;
pub use crate::lru::LruCache;
