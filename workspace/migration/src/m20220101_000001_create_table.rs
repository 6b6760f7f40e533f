use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table. The unique index on username is what closes
        // the check-then-insert race on concurrent registrations; the
        // application-level pre-check is advisory only.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 16))
                    .to_owned(),
            )
            .await?;

        // Create locations table. CreatedByUserId is a plain column, not a
        // foreign key: the owner cascade is executed explicitly (and
        // transactionally) when a user is deleted.
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(pk_auto(Locations::Id))
                    .col(string(Locations::Name))
                    .col(double(Locations::Latitude))
                    .col(double(Locations::Longitude))
                    .col(string_null(Locations::Description))
                    .col(string_null(Locations::Category))
                    .col(integer(Locations::CreatedByUserId))
                    .to_owned(),
            )
            .await?;

        // Create site_polygons table.
        manager
            .create_table(
                Table::create()
                    .table(SitePolygons::Table)
                    .if_not_exists()
                    .col(pk_auto(SitePolygons::Id))
                    .col(string(SitePolygons::Name))
                    .col(text(SitePolygons::GeoJson))
                    .col(string_null(SitePolygons::Description))
                    .col(string_null(SitePolygons::Category))
                    .col(double(SitePolygons::AreaSqM))
                    .col(double(SitePolygons::AreaHectares))
                    .col(double(SitePolygons::PerimeterMeters))
                    .col(integer(SitePolygons::CreatedByUserId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SitePolygons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Name,
    Latitude,
    Longitude,
    Description,
    Category,
    CreatedByUserId,
}

#[derive(DeriveIden)]
enum SitePolygons {
    Table,
    Id,
    Name,
    GeoJson,
    Description,
    Category,
    AreaSqM,
    AreaHectares,
    PerimeterMeters,
    CreatedByUserId,
}
