use sea_orm::entity::prelude::*;

/// A point marker placed on the map.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Degrees, [-90, 90]. Immutable after creation.
    pub latitude: f64,
    /// Degrees, [-180, 180]. Immutable after creation.
    pub longitude: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Owner back-reference used for list filtering and the explicit
    /// cascade at user deletion. Not a DB-enforced foreign key.
    pub created_by_user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A location belongs to the user who created it.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedByUserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
