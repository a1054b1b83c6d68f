//! Cache Entry Module
//!
//! Timestamps and the freshness rule shared by the store and the inspector.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CACHE_TTL_SECS;

// == Freshness ==
/// Returns true while an entry written at `written_at` may still be served.
///
/// Boundary condition: an entry is valid iff `now - written_at < CACHE_TTL_SECS`,
/// so it expires at exactly `written_at + CACHE_TTL_SECS`.
pub fn is_fresh(written_at: i64, now: i64) -> bool {
    now.saturating_sub(written_at) < CACHE_TTL_SECS
}

// == Recent Entry ==
/// A cached row as reported by inspection tooling (payload omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentEntry {
    /// City key as stored
    pub city: String,
    /// Write timestamp (Unix seconds)
    pub written_at: i64,
}

impl RecentEntry {
    /// Unix timestamp after which the entry is no longer served.
    pub fn expires_at(&self) -> i64 {
        self.written_at.saturating_add(CACHE_TTL_SECS)
    }

    /// Whether the entry is still valid at `now`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        is_fresh(self.written_at, now)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Formats a Unix timestamp as RFC 3339, or None if it is out of range.
pub fn format_timestamp(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.to_rfc3339())
}
