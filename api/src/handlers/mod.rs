//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod locations;

pub use locations::{
    create_location, delete_location, get_location, list_locations, update_location,
};
