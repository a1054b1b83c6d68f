//! Cache Module
//!
//! Provides durable SQLite caching of provider responses with time-based validity.

mod entry;
mod kind;
mod store;


// Re-export public types
pub use entry::{current_timestamp, format_timestamp, is_fresh, RecentEntry};
pub use kind::DataKind;
pub use store::CacheStore;

// == Public Constants ==
/// Seconds an entry stays valid after it is written
pub const CACHE_TTL_SECS: i64 = 3600;

/// Number of entries shown by the cache inspector
pub const RECENT_LIMIT: usize = 10;
