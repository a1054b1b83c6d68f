//! Error types for the weather proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Weather Error Enum ==
/// Unified error type for the weather proxy.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// A required setting (the provider API key) is missing
    #[error("{0}")]
    Configuration(String),

    /// The upstream provider has no data for the city
    #[error("City '{city}' not found")]
    NotFound { city: String },

    /// Any other upstream failure
    #[error("Weather API error: {0}")]
    Upstream(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// SQLite failure while opening, reading or writing the cache
    #[error("Cache storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A cached payload could not be encoded or decoded
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WeatherError {
    /// HTTP status reported to clients for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
            WeatherError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            WeatherError::Configuration(_)
            | WeatherError::Upstream(_)
            | WeatherError::Storage(_)
            | WeatherError::Serialization(_)
            | WeatherError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the weather proxy.
pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = WeatherError::NotFound {
            city: "Nowhereville".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "City 'Nowhereville' not found");
    }

    #[test]
    fn test_server_side_failures_map_to_500() {
        let config = WeatherError::Configuration("API key not configured".to_string());
        let upstream = WeatherError::Upstream("502 Bad Gateway".to_string());

        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.to_string(), "Weather API error: 502 Bad Gateway");
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let err = WeatherError::InvalidRequest("city must not be empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
