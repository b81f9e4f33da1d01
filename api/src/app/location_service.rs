//! Location service
//!
//! Validates and persists changes to the location tree. This is the only
//! place the hierarchy rules are enforced:
//! - location numbers are unique
//! - a parent must exist and share the child's building
//! - a location can never become its own ancestor

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{
    Location, LocationDetails, LocationId, LocationLookup, NewLocation,
};
use crate::domain::ports::LocationRepository;
use crate::error::{AppError, DomainError};

/// Input for creating a location. Identifiers arrive unparsed so the
/// service owns their validation.
#[derive(Debug, Clone)]
pub struct CreateLocation {
    pub building: String,
    pub location_name: String,
    pub location_number: String,
    pub area: i32,
    pub parent_id: Option<String>,
}

/// Partial update. `None` leaves a field unchanged.
///
/// `parent_id` distinguishes three cases: `None` keeps the current parent,
/// `Some(None)` detaches the location, `Some(Some(id))` re-parents it.
#[derive(Debug, Clone, Default)]
pub struct UpdateLocation {
    pub location_number: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub building: Option<String>,
    pub location_name: Option<String>,
    pub area: Option<i32>,
}

/// Service for managing locations
pub struct LocationService<LR>
where
    LR: LocationRepository,
{
    locations: Arc<LR>,
}

impl<LR> LocationService<LR>
where
    LR: LocationRepository,
{
    pub fn new(locations: Arc<LR>) -> Self {
        Self { locations }
    }

    /// Create a new location
    ///
    /// The duplicate-number check and the parent lookup share one store
    /// query.
    pub async fn create(&self, input: CreateLocation) -> Result<LocationDetails, AppError> {
        tracing::info!(
            location_number = %input.location_number,
            building = %input.building,
            "Creating new location"
        );

        let building = require_text("building", input.building)?;
        let location_name = require_text("locationName", input.location_name)?;
        let location_number = require_text("locationNumber", input.location_number)?;
        let area = require_area(input.area)?;
        let parent_id = input
            .parent_id
            .as_deref()
            .map(|raw| parse_id("parentId", raw))
            .transpose()?;

        let lookup = LocationLookup {
            ids: parent_id.into_iter().collect(),
            location_number: Some(location_number.clone()),
        };
        let matches = self.locations.find_matching(&lookup).await?;

        if matches.iter().any(|l| l.location_number == location_number) {
            tracing::warn!("Location number {} already exists", location_number);
            return Err(duplicate_number());
        }

        let parent = match parent_id {
            Some(parent_id) => Some(take_parent(&matches, parent_id)?),
            None => None,
        };
        if let Some(parent) = &parent {
            ensure_same_building(parent, &building)?;
        }

        let location = self
            .locations
            .create(&NewLocation {
                building,
                location_name,
                location_number,
                area,
                parent_id,
            })
            .await?;

        tracing::info!("Successfully created location {}", location.id);

        Ok(LocationDetails {
            location,
            parent,
            children: Vec::new(),
        })
    }

    /// List every location with its parent and children
    pub async fn find_all(&self) -> Result<Vec<LocationDetails>, AppError> {
        tracing::debug!("Fetching all locations");
        Ok(self.locations.find_all_details().await?)
    }

    /// Get a location by ID with its parent and children
    pub async fn find_one(&self, id: &str) -> Result<LocationDetails, AppError> {
        tracing::debug!("Fetching location {}", id);
        let id = parse_id("id", id)?;

        self.locations
            .find_details(&id)
            .await?
            .ok_or_else(|| location_not_found(&id))
    }

    /// Apply a partial update to a location
    ///
    /// The target, any holder of the proposed number, and the proposed
    /// parent are fetched in one store query.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateLocation,
    ) -> Result<LocationDetails, AppError> {
        tracing::info!("Updating location {}", id);
        let id = parse_id("id", id)?;

        let location_number = input
            .location_number
            .map(|v| require_text("locationNumber", v))
            .transpose()?;
        let building = input
            .building
            .map(|v| require_text("building", v))
            .transpose()?;
        let location_name = input
            .location_name
            .map(|v| require_text("locationName", v))
            .transpose()?;
        let area = input.area.map(require_area).transpose()?;
        let parent_change: Option<Option<LocationId>> = input
            .parent_id
            .map(|p| p.map(|raw| parse_id("parentId", &raw)).transpose())
            .transpose()?;

        let mut ids = vec![id];
        if let Some(Some(parent_id)) = parent_change {
            ids.push(parent_id);
        }
        let lookup = LocationLookup {
            ids,
            location_number: location_number.clone(),
        };
        let matches = self.locations.find_matching(&lookup).await?;

        let current = matches
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| location_not_found(&id))?;

        if let Some(number) = &location_number {
            if matches
                .iter()
                .any(|l| &l.location_number == number && l.id != id)
            {
                tracing::warn!("Location number {} already exists", number);
                return Err(duplicate_number());
            }
        }

        let parent_id = match parent_change {
            Some(change) => change,
            None => current.parent_id,
        };
        let effective_building = building.as_deref().unwrap_or(&current.building);

        if let Some(Some(parent_id)) = parent_change {
            let parent = take_parent(&matches, parent_id)?;
            ensure_same_building(&parent, effective_building)?;
            self.ensure_not_descendant(id, &parent).await?;
        }

        // Moving buildings must still agree with a kept parent and every child
        if !current.same_building(effective_building) {
            let relations = self
                .locations
                .find_details(&id)
                .await?
                .ok_or_else(|| location_not_found(&id))?;
            if parent_change.is_none() {
                if let Some(parent) = &relations.parent {
                    ensure_same_building(parent, effective_building)?;
                }
            }
            ensure_children_follow(&relations.children, effective_building)?;
        }

        let updated = Location {
            id,
            building: building.unwrap_or(current.building),
            location_name: location_name.unwrap_or(current.location_name),
            location_number: location_number.unwrap_or(current.location_number),
            area: area.unwrap_or(current.area),
            parent_id,
        };
        self.locations.update(&updated).await?;

        tracing::info!("Successfully updated location {}", id);

        self.locations
            .find_details(&id)
            .await?
            .ok_or_else(|| location_not_found(&id))
    }

    /// Delete a location and, through the store cascade, its descendants.
    /// Unknown IDs are a no-op.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        tracing::info!("Deleting location {}", id);
        let id = parse_id("id", id)?;

        let removed = self.locations.delete(&id).await?;
        if removed == 0 {
            tracing::debug!("Location {} did not exist, nothing deleted", id);
        } else {
            tracing::info!("Successfully deleted location {}", id);
        }
        Ok(())
    }

    /// Reject a parent that is the location itself or one of its descendants
    async fn ensure_not_descendant(
        &self,
        id: LocationId,
        parent: &Location,
    ) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        let mut cursor = Some(parent.clone());

        while let Some(ancestor) = cursor {
            if ancestor.id == id {
                tracing::warn!("Location {} cannot be nested under itself", id);
                return Err(AppError::Domain(DomainError::InvalidArgument(
                    "parentId: a location cannot be nested under itself or its descendants."
                        .to_string(),
                )));
            }
            if !seen.insert(ancestor.id) {
                return Err(AppError::Domain(DomainError::Internal(format!(
                    "cycle in stored hierarchy at location {}",
                    ancestor.id
                ))));
            }
            cursor = match ancestor.parent_id {
                Some(next) => self.locations.find_by_id(&next).await?,
                None => None,
            };
        }
        Ok(())
    }
}

fn parse_id(field: &str, raw: &str) -> Result<LocationId, AppError> {
    raw.parse().map_err(|_| {
        tracing::warn!("Invalid UUID format for {}: {}", field, raw);
        AppError::Domain(DomainError::InvalidArgument(format!(
            "{}: invalid location ID format.",
            field
        )))
    })
}

fn require_text(field: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Domain(DomainError::InvalidArgument(format!(
            "{} must not be empty.",
            field
        ))));
    }
    Ok(value)
}

fn require_area(area: i32) -> Result<i32, AppError> {
    if area < 0 {
        return Err(AppError::Domain(DomainError::InvalidArgument(
            "area must not be negative.".to_string(),
        )));
    }
    Ok(area)
}

fn take_parent(matches: &[Location], parent_id: LocationId) -> Result<Location, AppError> {
    matches
        .iter()
        .find(|l| l.id == parent_id)
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("Parent location {} not found", parent_id);
            AppError::Domain(DomainError::NotFound(format!(
                "Parent location with ID {} not found.",
                parent_id
            )))
        })
}

fn ensure_same_building(parent: &Location, building: &str) -> Result<(), AppError> {
    if parent.same_building(building) {
        return Ok(());
    }
    tracing::warn!(
        "Building mismatch: parent {} is in {}, child in {}",
        parent.id,
        parent.building,
        building
    );
    Err(AppError::Domain(DomainError::InvalidArgument(
        "building: parent and child location must be in the same building.".to_string(),
    )))
}

fn ensure_children_follow(children: &[Location], building: &str) -> Result<(), AppError> {
    match children.iter().find(|child| !child.same_building(building)) {
        None => Ok(()),
        Some(child) => {
            tracing::warn!(
                "Building mismatch: child {} stays in {}, parent moves to {}",
                child.id,
                child.building,
                building
            );
            Err(AppError::Domain(DomainError::InvalidArgument(
                "building: child locations must be in the same building as their parent."
                    .to_string(),
            )))
        }
    }
}

fn duplicate_number() -> AppError {
    AppError::Domain(DomainError::Conflict(
        "Location number already exists.".to_string(),
    ))
}

fn location_not_found(id: &LocationId) -> AppError {
    tracing::warn!("Location {} not found", id);
    AppError::Domain(DomainError::NotFound(format!(
        "Location with ID {} not found.",
        id
    )))
}
