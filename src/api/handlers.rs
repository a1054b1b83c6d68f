//! API Handlers
//!
//! HTTP request handlers for each weather proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use tracing::error;

use crate::cache::{CacheStore, DataKind};
use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::fetch::WeatherService;
use crate::models::{CityQuery, StatusResponse};
use crate::upstream::{OpenWeatherClient, UpstreamProvider};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-backed fetch layer
    pub service: WeatherService,
}

impl AppState {
    /// Creates a new AppState around a store and a provider.
    pub fn new(store: CacheStore, provider: Arc<dyn UpstreamProvider>) -> Self {
        Self {
            service: WeatherService::new(store, provider),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens (and initializes) the cache database and builds the OpenWeather client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = CacheStore::open(&config.db_path)?;
        let client = OpenWeatherClient::from_config(config)
            .map_err(|e| WeatherError::Internal(e.to_string()))?;
        Ok(Self::new(store, Arc::new(client)))
    }
}

async fn fetch_kind(state: &AppState, kind: DataKind, query: &CityQuery) -> Result<Json<Value>> {
    let city = query.city().map_err(WeatherError::InvalidRequest)?;
    let payload = state.service.fetch(kind, city).await?;
    Ok(Json(payload))
}

/// Handler for GET /api/weather?city=
///
/// Returns the provider's current-weather document for the city.
pub async fn weather_handler(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Value>> {
    fetch_kind(&state, DataKind::CurrentWeather, &query).await
}

/// Handler for GET /api/forecast?city=
///
/// Returns the provider's 5-day forecast document for the city.
pub async fn forecast_handler(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Value>> {
    fetch_kind(&state, DataKind::Forecast, &query).await
}

/// Handler for GET /api/status
///
/// Reports cache statistics. Storage failures are reported in the body, not
/// as an HTTP error.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    match state.service.status().await {
        Ok(cache) => Json(StatusResponse::ok(cache)),
        Err(e) => {
            error!(error = %e, "failed to read cache status");
            Json(StatusResponse::error(e.to_string()))
        }
    }
}
