//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod location_repo;


pub use location_repo::PostgresLocationRepository;
