//! Upstream Module
//!
//! The capability the fetch layer calls on a cache miss, and its
//! OpenWeatherMap implementation.

mod openweather;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::cache::DataKind;

pub use openweather::OpenWeatherClient;

// == Provider Error ==
/// Failures reported by an upstream weather provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API credential is configured
    #[error("API key not configured")]
    MissingCredential,

    /// The provider does not know the requested city
    #[error("city not found")]
    NotFound,

    /// Transport failure, unexpected status or unreadable body
    #[error("{0}")]
    Failed(String),
}

// == Upstream Provider ==
/// Source of weather payloads for a (kind, city) pair.
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Returns an error when the provider cannot be used at all.
    fn check_configured(&self) -> Result<(), ProviderError>;

    /// Fetches the raw provider document for `city`.
    async fn fetch(&self, kind: DataKind, city: &str) -> Result<Value, ProviderError>;
}
