//! API Module
//!
//! HTTP handlers and routing for the weather proxy REST API.
//!
//! # Endpoints
//! - `GET /api/weather?city=` - Current weather for a city
//! - `GET /api/forecast?city=` - 5-day forecast for a city
//! - `GET /api/status` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
