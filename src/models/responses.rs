//! Response DTOs for the weather proxy API
//!
//! Data endpoints return the provider document as-is; only the status
//! endpoint has a shape of its own.

use serde::Serialize;

/// Cache statistics for one data kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindStatus {
    /// Rows stored, valid or expired
    pub count: u64,
    /// RFC 3339 time of the most recent write, null when empty
    pub latest: Option<String>,
}

/// Cache statistics for both data kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub weather: KindStatus,
    pub forecast: KindStatus,
}

/// Response body for `GET /api/status`
///
/// Serializes as `{"status":"ok","cache":{...}}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusResponse {
    /// Cache is readable
    Ok { cache: CacheStatus },
    /// Cache could not be read
    Error { message: String },
}

impl StatusResponse {
    /// Creates a successful status report
    pub fn ok(cache: CacheStatus) -> Self {
        Self::Ok { cache }
    }

    /// Creates a failed status report
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
