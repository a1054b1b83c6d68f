//! Request DTOs for the weather proxy API
//!
//! Defines the query parameters accepted by the data endpoints.

use serde::Deserialize;

/// Query string for `GET /api/weather` and `GET /api/forecast`
///
/// # Fields
/// - `city`: City name as understood by the upstream provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityQuery {
    /// The requested city
    #[serde(default)]
    pub city: Option<String>,
}

impl CityQuery {
    /// Returns the trimmed city name, or an error message if it is absent or blank.
    pub fn city(&self) -> Result<&str, String> {
        match self.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => Ok(city),
            _ => Err("Query parameter 'city' is required".to_string()),
        }
    }
}
