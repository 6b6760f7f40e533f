use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. Closed at the type level so a mistyped role string can
/// never round-trip through the database or a token claim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "User")]
    User,
    #[sea_orm(string_value = "Admin")]
    Admin,
}

/// Represents a registered account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Bcrypt output. Only the hash is ever stored; it never leaves the
    /// admin boundary in any response projection.
    pub password_hash: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can own multiple map records of both kinds.
    #[sea_orm(has_many = "super::location::Entity")]
    Location,
    #[sea_orm(has_many = "super::site_polygon::Entity")]
    SitePolygon,
}

impl ActiveModelBehavior for ActiveModel {}
