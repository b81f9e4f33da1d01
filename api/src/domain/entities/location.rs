//! Location domain entity
//!
//! A node in a building hierarchy: a building, a room, a shelf. Every
//! location carries a unique location number and may hang under a parent
//! location in the same building.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Length of the canonical hyphenated UUID form
const HYPHENATED_LEN: usize = 36;

/// Unique identifier for a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub Uuid);

impl LocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LocationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Only the hyphenated form is accepted. The simple, braced and URN
/// spellings that `Uuid::parse_str` also takes are rejected.
impl std::str::FromStr for LocationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HYPHENATED_LEN {
            return Err(DomainError::InvalidArgument(format!(
                "not a hyphenated UUID: {}",
                s
            )));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))
    }
}

/// A stored location. Relations are kept as identifiers; see
/// [`LocationDetails`] for the resolved form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub building: String,
    pub location_name: String,
    pub location_number: String,
    pub area: i32,
    pub parent_id: Option<LocationId>,
}

impl Location {
    /// Whether `building` names the same building as this location's
    pub fn same_building(&self, building: &str) -> bool {
        self.building == building
    }
}

/// Data needed to create a new location
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub building: String,
    pub location_name: String,
    pub location_number: String,
    pub area: i32,
    pub parent_id: Option<LocationId>,
}

/// A location together with its parent and direct children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDetails {
    pub location: Location,
    pub parent: Option<Location>,
    pub children: Vec<Location>,
}

/// Criteria for a single store round-trip: every location whose id is in
/// `ids` OR whose number equals `location_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationLookup {
    pub ids: Vec<LocationId>,
    pub location_number: Option<String>,
}

impl LocationLookup {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.location_number.is_none()
    }

    pub fn matches(&self, location: &Location) -> bool {
        self.ids.contains(&location.id)
            || self.location_number.as_deref() == Some(location.location_number.as_str())
    }
}

/// Resolve parent and children for every location in `locations`.
///
/// Output order follows input order. A parent id that is not part of the
/// input resolves to `None`.
pub fn resolve_relations(locations: &[Location]) -> Vec<LocationDetails> {
    let by_id: HashMap<LocationId, &Location> = locations.iter().map(|l| (l.id, l)).collect();

    let mut children: HashMap<LocationId, Vec<Location>> = HashMap::new();
    for location in locations {
        if let Some(parent_id) = location.parent_id {
            children.entry(parent_id).or_default().push(location.clone());
        }
    }

    locations
        .iter()
        .map(|location| LocationDetails {
            location: location.clone(),
            parent: location
                .parent_id
                .and_then(|id| by_id.get(&id).map(|p| (*p).clone())),
            children: children.remove(&location.id).unwrap_or_default(),
        })
        .collect()
}
