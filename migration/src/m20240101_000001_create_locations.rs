//! Create the `locations` table.
//!
//! `location_number` is unique, and `parent_id` references the same table
//! with `ON DELETE CASCADE` so removing a location removes its whole subtree.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(uuid(Locations::Id).primary_key())
                    .col(text(Locations::Building))
                    .col(text(Locations::LocationName))
                    .col(text_uniq(Locations::LocationNumber))
                    .col(integer(Locations::Area).check(Expr::col(Locations::Area).gte(0)))
                    .col(uuid_null(Locations::ParentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_parent")
                            .from(Locations::Table, Locations::ParentId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_parent_id")
                    .table(Locations::Table)
                    .col(Locations::ParentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Building,
    LocationName,
    LocationNumber,
    Area,
    ParentId,
}
