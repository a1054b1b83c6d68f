//! Request and Response models for the weather proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::CityQuery;
pub use responses::{CacheStatus, KindStatus, StatusResponse};
