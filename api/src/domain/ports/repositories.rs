//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{Location, LocationDetails, LocationId, LocationLookup, NewLocation};
use crate::error::DomainError;

/// Repository for Location entities
///
/// Implementations must enforce the same integrity rules as the schema:
/// unique `location_number`, existing `parent_id`, and cascading delete
/// of descendants.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Find a location by ID
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError>;

    /// Find every location matching any criterion of the lookup, in one query
    async fn find_matching(&self, lookup: &LocationLookup) -> Result<Vec<Location>, DomainError>;

    /// Find a location with its parent and children resolved
    async fn find_details(&self, id: &LocationId) -> Result<Option<LocationDetails>, DomainError>;

    /// List all locations with relations resolved, ordered by location number
    async fn find_all_details(&self) -> Result<Vec<LocationDetails>, DomainError>;

    /// Create a new location
    async fn create(&self, location: &NewLocation) -> Result<Location, DomainError>;

    /// Overwrite an existing location's fields
    async fn update(&self, location: &Location) -> Result<Location, DomainError>;

    /// Delete a location and its descendants, returning the rows removed
    /// from the target table directly (0 if the id was unknown)
    async fn delete(&self, id: &LocationId) -> Result<u64, DomainError>;
}
