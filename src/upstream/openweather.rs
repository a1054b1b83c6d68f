//! OpenWeatherMap API client
//!
//! Fetches current conditions and 5-day forecasts by city name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{ProviderError, UpstreamProvider};
use crate::cache::DataKind;
use crate::config::Config;

/// Client for the OpenWeatherMap 2.5 API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Failed(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a client from server configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.upstream_timeout),
        )
    }

    fn endpoint(&self, kind: DataKind) -> String {
        let path = match kind {
            DataKind::CurrentWeather => "weather",
            DataKind::Forecast => "forecast",
        };
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl UpstreamProvider for OpenWeatherClient {
    fn check_configured(&self) -> Result<(), ProviderError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ProviderError::MissingCredential),
        }
    }

    async fn fetch(&self, kind: DataKind, city: &str) -> Result<Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;
        let url = self.endpoint(kind);
        debug!(%kind, city, %url, "requesting upstream");

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ProviderError::Failed(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(ProviderError::Failed(format!(
                "upstream returned {}",
                status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Failed(format!("invalid upstream response: {}", e)))
    }
}
