//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use tracing::debug;

/// Default location of the SQLite cache database.
pub const DEFAULT_DB_PATH: &str = "app/data/weather_cache.db";

/// Default OpenWeatherMap API root.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key; requests fail with a configuration error when unset
    pub api_key: Option<String>,
    /// Base URL of the OpenWeatherMap API
    pub base_url: String,
    /// Path of the SQLite cache database
    pub db_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Timeout in seconds for upstream requests
    pub upstream_timeout: u64,
}

impl Config {
    /// Loads a `.env` file from the working directory or its parents, if any,
    /// then reads the configuration from the environment.
    ///
    /// Variables already set in the process environment take precedence over
    /// the file.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::from_env()
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OPENWEATHER_API_KEY` - Provider API key (default: unset)
    /// - `OPENWEATHER_BASE_URL` - Provider API root (default: OpenWeatherMap 2.5)
    /// - `DB_PATH` - Cache database file (default: app/data/weather_cache.db)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a Config from any key lookup, applying defaults for missing or
    /// unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_key: lookup("OPENWEATHER_API_KEY").filter(|v| !v.trim().is_empty()),
            base_url: lookup("OPENWEATHER_BASE_URL").unwrap_or(defaults.base_url),
            db_path: lookup("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_timeout: lookup("UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            server_port: 8000,
            upstream_timeout: 10,
        }
    }
}
