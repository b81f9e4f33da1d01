//! PostgreSQL adapter for LocationRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::entities::{
    resolve_relations, Location, LocationDetails, LocationId, LocationLookup, NewLocation,
};
use crate::domain::ports::LocationRepository;
use crate::entity::locations;
use crate::error::DomainError;

/// PostgreSQL implementation of LocationRepository
///
/// Uniqueness of `location_number` and the parent foreign key are enforced by
/// the schema; violations surface as `Conflict` and `NotFound` so a request
/// that loses a race against a concurrent write still gets a client error.
pub struct PostgresLocationRepository {
    db: DatabaseConnection,
}

impl PostgresLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        let result = locations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_matching(&self, lookup: &LocationLookup) -> Result<Vec<Location>, DomainError> {
        if lookup.is_empty() {
            return Ok(Vec::new());
        }

        let mut condition = Condition::any();
        if !lookup.ids.is_empty() {
            condition =
                condition.add(locations::Column::Id.is_in(lookup.ids.iter().map(|id| id.0)));
        }
        if let Some(number) = &lookup.location_number {
            condition = condition.add(locations::Column::LocationNumber.eq(number.as_str()));
        }

        let results = locations::Entity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_details(&self, id: &LocationId) -> Result<Option<LocationDetails>, DomainError> {
        let Some(model) = locations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let parent = match model.parent_id {
            Some(parent_id) => locations::Entity::find_by_id(parent_id)
                .one(&self.db)
                .await
                .map_err(map_db_err)?,
            None => None,
        };

        let children = by_number(
            locations::Entity::find().filter(locations::Column::ParentId.eq(model.id)),
        )
        .all(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(Some(LocationDetails {
            location: model.into(),
            parent: parent.map(|m| m.into()),
            children: children.into_iter().map(|m| m.into()).collect(),
        }))
    }

    async fn find_all_details(&self) -> Result<Vec<LocationDetails>, DomainError> {
        let results = by_number(locations::Entity::find())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let all: Vec<Location> = results.into_iter().map(|m| m.into()).collect();
        Ok(resolve_relations(&all))
    }

    async fn create(&self, location: &NewLocation) -> Result<Location, DomainError> {
        let model = locations::ActiveModel {
            id: Set(Uuid::new_v4()),
            building: Set(location.building.clone()),
            location_name: Set(location.location_name.clone()),
            location_number: Set(location.location_number.clone()),
            area: Set(location.area),
            parent_id: Set(location.parent_id.map(|id| id.0)),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(&self, location: &Location) -> Result<Location, DomainError> {
        let result = locations::ActiveModel {
            id: Set(location.id.0),
            building: Set(location.building.clone()),
            location_name: Set(location.location_name.clone()),
            location_number: Set(location.location_number.clone()),
            area: Set(location.area),
            parent_id: Set(location.parent_id.map(|id| id.0)),
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &LocationId) -> Result<u64, DomainError> {
        // Descendants go with it through the ON DELETE CASCADE foreign key
        let result = locations::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

/// Ascending `location_number` in byte order, independent of the database
/// collation
fn by_number<Q: QueryOrder>(query: Q) -> Q {
    query.order_by(Expr::cust(r#""location_number" COLLATE "C""#), Order::Asc)
}

fn map_db_err(err: DbErr) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict("Location number already exists.".to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::NotFound("Parent location not found.".to_string())
        }
        _ => match err {
            DbErr::RecordNotUpdated => DomainError::NotFound("Location not found.".to_string()),
            e => DomainError::Database(e.to_string()),
        },
    }
}

/// Convert SeaORM model to domain entity
impl From<locations::Model> for Location {
    fn from(model: locations::Model) -> Self {
        Location {
            id: LocationId(model.id),
            building: model.building,
            location_name: model.location_name,
            location_number: model.location_number,
            area: model.area,
            parent_id: model.parent_id.map(LocationId),
        }
    }
}
