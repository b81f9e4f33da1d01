//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    resolve_relations, Location, LocationDetails, LocationId, LocationLookup, NewLocation,
};
use crate::domain::ports::LocationRepository;
use crate::error::DomainError;

// ============================================================================
// In-Memory Location Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryLocationRepository {
    locations: Arc<RwLock<HashMap<LocationId, Location>>>,
    calls: AtomicUsize,
    failing: bool,
}

impl InMemoryLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with a database error
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a location for testing
    pub fn with_location(self, location: Location) -> Self {
        {
            let mut locations = self.locations.write().unwrap();
            locations.insert(location.id, location);
        }
        self
    }

    /// Number of repository calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored location
    pub fn all(&self) -> Vec<Location> {
        self.locations.read().unwrap().values().cloned().collect()
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(DomainError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_integrity(
        locations: &HashMap<LocationId, Location>,
        id: LocationId,
        number: &str,
        parent_id: Option<LocationId>,
    ) -> Result<(), DomainError> {
        if locations
            .values()
            .any(|l| l.location_number == number && l.id != id)
        {
            return Err(DomainError::Conflict(
                "Location number already exists.".to_string(),
            ));
        }
        if let Some(parent_id) = parent_id {
            if !locations.contains_key(&parent_id) {
                return Err(DomainError::NotFound(
                    "Parent location not found.".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn sorted(locations: &HashMap<LocationId, Location>) -> Vec<Location> {
        let mut all: Vec<Location> = locations.values().cloned().collect();
        all.sort_by(|a, b| a.location_number.cmp(&b.location_number));
        all
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        self.enter()?;
        let locations = self.locations.read().unwrap();
        Ok(locations.get(id).cloned())
    }

    async fn find_matching(&self, lookup: &LocationLookup) -> Result<Vec<Location>, DomainError> {
        self.enter()?;
        let locations = self.locations.read().unwrap();
        Ok(locations
            .values()
            .filter(|l| lookup.matches(l))
            .cloned()
            .collect())
    }

    async fn find_details(&self, id: &LocationId) -> Result<Option<LocationDetails>, DomainError> {
        self.enter()?;
        let locations = self.locations.read().unwrap();
        Ok(resolve_relations(&Self::sorted(&locations))
            .into_iter()
            .find(|d| d.location.id == *id))
    }

    async fn find_all_details(&self) -> Result<Vec<LocationDetails>, DomainError> {
        self.enter()?;
        let locations = self.locations.read().unwrap();
        Ok(resolve_relations(&Self::sorted(&locations)))
    }

    async fn create(&self, new_location: &NewLocation) -> Result<Location, DomainError> {
        self.enter()?;
        let location = Location {
            id: LocationId(uuid::Uuid::new_v4()),
            building: new_location.building.clone(),
            location_name: new_location.location_name.clone(),
            location_number: new_location.location_number.clone(),
            area: new_location.area,
            parent_id: new_location.parent_id,
        };

        let mut locations = self.locations.write().unwrap();
        Self::check_integrity(
            &locations,
            location.id,
            &location.location_number,
            location.parent_id,
        )?;
        locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update(&self, location: &Location) -> Result<Location, DomainError> {
        self.enter()?;
        let mut locations = self.locations.write().unwrap();
        if !locations.contains_key(&location.id) {
            return Err(DomainError::NotFound("Location not found.".to_string()));
        }
        Self::check_integrity(
            &locations,
            location.id,
            &location.location_number,
            location.parent_id,
        )?;
        locations.insert(location.id, location.clone());
        Ok(location.clone())
    }

    async fn delete(&self, id: &LocationId) -> Result<u64, DomainError> {
        self.enter()?;
        let mut locations = self.locations.write().unwrap();
        if locations.remove(id).is_none() {
            return Ok(0);
        }

        // Cascade to descendants, one level at a time
        let mut removed = vec![*id];
        while let Some(parent_id) = removed.pop() {
            let children: Vec<LocationId> = locations
                .values()
                .filter(|l| l.parent_id == Some(parent_id))
                .map(|l| l.id)
                .collect();
            for child in children {
                locations.remove(&child);
                removed.push(child);
            }
        }
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_child_of, test_location_in};

    #[tokio::test]
    async fn delete_cascades_through_all_levels() {
        let root = test_location_in("Building A", "LOC-001");
        let child = test_child_of(&root, "LOC-002");
        let grandchild = test_child_of(&child, "LOC-003");
        let unrelated = test_location_in("Building A", "LOC-004");
        let repo = InMemoryLocationRepository::new()
            .with_location(root.clone())
            .with_location(child)
            .with_location(grandchild)
            .with_location(unrelated.clone());

        assert_eq!(repo.delete(&root.id).await.unwrap(), 1);

        assert_eq!(repo.all(), vec![unrelated]);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_number() {
        let existing = test_location_in("Building A", "LOC-001");
        let repo = InMemoryLocationRepository::new().with_location(existing);

        let result = repo
            .create(&NewLocation {
                building: "Building B".to_string(),
                location_name: "Other".to_string(),
                location_number: "LOC-001".to_string(),
                area: 1,
                parent_id: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn children_sort_by_number_bytewise() {
        let root = test_location_in("Building A", "R-1");
        let lower = test_child_of(&root, "a-1");
        let upper = test_child_of(&root, "Z-1");
        let repo = InMemoryLocationRepository::new()
            .with_location(root.clone())
            .with_location(lower.clone())
            .with_location(upper.clone());

        let details = repo.find_details(&root.id).await.unwrap().unwrap();

        assert_eq!(details.children, vec![upper, lower]);
    }

    #[tokio::test]
    async fn failing_repository_counts_calls() {
        let repo = InMemoryLocationRepository::failing();

        let result = repo.find_all_details().await;

        assert!(matches!(result, Err(DomainError::Database(_))));
        assert_eq!(repo.call_count(), 1);
    }
}
