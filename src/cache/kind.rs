//! Data Kind Module
//!
//! Maps each category of weather data onto its cache table.

use std::fmt;

use serde::Serialize;

// == Data Kind ==
/// The two categories of data the proxy caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// Current conditions for a city
    CurrentWeather,
    /// Multi-day forecast for a city
    Forecast,
}

impl DataKind {
    /// Every kind, in reporting order.
    pub const ALL: [DataKind; 2] = [DataKind::CurrentWeather, DataKind::Forecast];

    /// SQLite table holding entries of this kind.
    ///
    /// Table names used in SQL text only ever come from here.
    pub fn table(self) -> &'static str {
        match self {
            DataKind::CurrentWeather => "weather_cache",
            DataKind::Forecast => "forecast_cache",
        }
    }

    /// Short label used in logs and status output.
    pub fn label(self) -> &'static str {
        match self {
            DataKind::CurrentWeather => "weather",
            DataKind::Forecast => "forecast",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
