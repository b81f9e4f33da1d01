//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use uuid::Uuid;

use crate::domain::entities::{Location, LocationId};

/// Fixed ID used where a test needs a well-known, well-formed identifier
pub const TEST_LOCATION_ID: &str = "10eec6f4-2e1d-4e4a-844f-95996dc43b6d";

/// Create a test location with default values
pub fn test_location() -> Location {
    Location {
        id: LocationId(Uuid::parse_str(TEST_LOCATION_ID).unwrap()),
        building: "Building A".to_string(),
        location_name: "Warehouse A".to_string(),
        location_number: "LOC-001".to_string(),
        area: 100,
        parent_id: None,
    }
}

/// Create a root location with a specific number and building
pub fn test_location_in(building: &str, number: &str) -> Location {
    Location {
        id: LocationId(Uuid::new_v4()),
        building: building.to_string(),
        location_name: format!("Location {}", number),
        location_number: number.to_string(),
        area: 10,
        parent_id: None,
    }
}

/// Create a location nested under `parent`, in the parent's building
pub fn test_child_of(parent: &Location, number: &str) -> Location {
    Location {
        parent_id: Some(parent.id),
        ..test_location_in(&parent.building, number)
    }
}
