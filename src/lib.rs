//! Weather Proxy - a caching HTTP proxy for weather data
//!
//! Serves current weather and forecasts by city, answering from a SQLite
//! cache while entries are under an hour old and from OpenWeatherMap otherwise.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod inspect;
pub mod models;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use fetch::WeatherService;
