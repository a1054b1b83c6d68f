//! Fetch Orchestrator
//!
//! Cache-first acquisition of weather payloads with fallback to the upstream
//! provider.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{format_timestamp, CacheStore, DataKind};
use crate::error::{Result, WeatherError};
use crate::models::{CacheStatus, KindStatus};
use crate::upstream::{ProviderError, UpstreamProvider};

// == Weather Service ==
/// Serves weather payloads from the cache, calling the provider on a miss.
///
/// Concurrent misses for the same city are not coalesced: each one calls the
/// provider and the last write wins.
#[derive(Clone)]
pub struct WeatherService {
    store: CacheStore,
    provider: Arc<dyn UpstreamProvider>,
}

impl WeatherService {
    /// Creates a service over an opened store and a provider.
    pub fn new(store: CacheStore, provider: Arc<dyn UpstreamProvider>) -> Self {
        Self { store, provider }
    }

    // == Fetch ==
    /// Returns the payload for (`kind`, `city`).
    ///
    /// A valid cached entry is returned without contacting the provider. Otherwise
    /// the provider is called once and, only on success, its payload is cached.
    pub async fn fetch(&self, kind: DataKind, city: &str) -> Result<Value> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidRequest(
                "city must not be empty".to_string(),
            ));
        }

        self.provider
            .check_configured()
            .map_err(|e| WeatherError::Configuration(e.to_string()))?;

        let lookup_city = city.to_string();
        let cached = self
            .with_store(move |store| store.get(kind, &lookup_city))
            .await?;
        if let Some(payload) = cached {
            info!(%kind, city, "cache hit");
            return Ok(payload);
        }

        info!(%kind, city, "cache miss, fetching from upstream");
        let payload = self
            .provider
            .fetch(kind, city)
            .await
            .map_err(|e| {
                warn!(%kind, city, error = %e, "upstream fetch failed");
                match e {
                    ProviderError::NotFound => WeatherError::NotFound {
                        city: city.to_string(),
                    },
                    ProviderError::Failed(details) => WeatherError::Upstream(details),
                    missing @ ProviderError::MissingCredential => {
                        WeatherError::Configuration(missing.to_string())
                    }
                }
            })?;

        let write_city = city.to_string();
        let stored = payload.clone();
        self.with_store(move |store| store.put(kind, &write_city, &stored))
            .await?;

        Ok(payload)
    }

    // == Status ==
    /// Entry counts and latest write times for both kinds.
    pub async fn status(&self) -> Result<CacheStatus> {
        self.with_store(|store| {
            let describe = |kind: DataKind| -> Result<KindStatus> {
                Ok(KindStatus {
                    count: store.count(kind)?,
                    latest: store.latest_timestamp(kind)?.and_then(format_timestamp),
                })
            };

            Ok(CacheStatus {
                weather: describe(DataKind::CurrentWeather)?,
                forecast: describe(DataKind::Forecast)?,
            })
        })
        .await
    }

    /// Runs a store operation on the blocking thread pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&CacheStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| WeatherError::Internal(format!("cache task failed: {}", e)))?
    }
}
