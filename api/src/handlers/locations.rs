//! Location handlers
//!
//! CRUD endpoints for the location hierarchy.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::app::{CreateLocation, UpdateLocation};
use crate::domain::entities::{Location, LocationDetails};
use crate::domain::ports::LocationRepository;
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a location
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub building: String,
    pub location_name: String,
    pub location_number: String,
    pub area: i32,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Request body for updating a location. Every field is optional.
///
/// `parentId` may be omitted (keep the parent), `null` (detach) or an ID.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub location_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub parent_id: Option<Option<String>>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub area: Option<i32>,
}

/// Marks a field as present, so an explicit `null` becomes `Some(None)`
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A location without its relations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub id: String,
    pub building: String,
    pub location_name: String,
    pub location_number: String,
    pub area: i32,
}

/// A location with its parent and children
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    #[serde(flatten)]
    pub location: LocationSummary,
    pub parent: Option<LocationSummary>,
    pub children: Vec<LocationSummary>,
}

impl From<Location> for LocationSummary {
    fn from(location: Location) -> Self {
        LocationSummary {
            id: location.id.to_string(),
            building: location.building,
            location_name: location.location_name,
            location_number: location.location_number,
            area: location.area,
        }
    }
}

impl From<LocationDetails> for LocationResponse {
    fn from(details: LocationDetails) -> Self {
        LocationResponse {
            location: details.location.into(),
            parent: details.parent.map(Into::into),
            children: details.children.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateLocationRequest> for CreateLocation {
    fn from(request: CreateLocationRequest) -> Self {
        CreateLocation {
            building: request.building,
            location_name: request.location_name,
            location_number: request.location_number,
            area: request.area,
            parent_id: request.parent_id,
        }
    }
}

impl From<UpdateLocationRequest> for UpdateLocation {
    fn from(request: UpdateLocationRequest) -> Self {
        UpdateLocation {
            location_number: request.location_number,
            parent_id: request.parent_id,
            building: request.building,
            location_name: request.location_name,
            area: request.area,
        }
    }
}

/// POST /locations
///
/// Create a location, optionally under a parent in the same building.
pub async fn create_location<LR>(
    State(state): State<AppState<LR>>,
    payload: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LocationResponse>), AppError>
where
    LR: LocationRepository + 'static,
{
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let created = state.location_service.create(request.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /locations
///
/// List every location with parent and children.
pub async fn list_locations<LR>(
    State(state): State<AppState<LR>>,
) -> Result<Json<Vec<LocationResponse>>, AppError>
where
    LR: LocationRepository + 'static,
{
    let locations = state.location_service.find_all().await?;

    Ok(Json(locations.into_iter().map(Into::into).collect()))
}

/// GET /locations/:id
pub async fn get_location<LR>(
    State(state): State<AppState<LR>>,
    Path(id): Path<String>,
) -> Result<Json<LocationResponse>, AppError>
where
    LR: LocationRepository + 'static,
{
    let location = state.location_service.find_one(&id).await?;

    Ok(Json(location.into()))
}

/// PATCH /locations/:id
///
/// Partial update; omitted fields keep their current value.
pub async fn update_location<LR>(
    State(state): State<AppState<LR>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<Json<LocationResponse>, AppError>
where
    LR: LocationRepository + 'static,
{
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let updated = state.location_service.update(&id, request.into()).await?;

    Ok(Json(updated.into()))
}

/// DELETE /locations/:id
///
/// Deleting a parent deletes all of its descendants.
pub async fn delete_location<LR>(
    State(state): State<AppState<LR>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    LR: LocationRepository + 'static,
{
    state.location_service.remove(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
