//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod location_service;

pub use location_service::{CreateLocation, LocationService, UpdateLocation};
