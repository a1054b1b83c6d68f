//! API Routes
//!
//! Configures the Axum router with all weather proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{forecast_handler, status_handler, weather_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/weather?city=` - Current weather for a city
/// - `GET /api/forecast?city=` - 5-day forecast for a city
/// - `GET /api/status` - Cache statistics
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/weather", get(weather_handler))
        .route("/api/forecast", get(forecast_handler))
        .route("/api/status", get(status_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
