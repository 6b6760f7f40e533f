use sea_orm::entity::prelude::*;

/// A user-drawn parcel stored as a GeoJSON Polygon Feature, together with
/// the area/perimeter metrics the map client computed from the drawn
/// geometry. The metrics are accepted as supplied and never recomputed or
/// validated against `geo_json`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "site_polygons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Serialized GeoJSON Polygon Feature, single caller-closed outer ring.
    /// Set at creation, immutable thereafter.
    pub geo_json: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub area_sq_m: f64,
    /// Always area_sq_m / 10000 by convention; stored as supplied.
    pub area_hectares: f64,
    pub perimeter_meters: f64,
    /// Owner back-reference, same model as locations.
    pub created_by_user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A parcel belongs to the user who drew it.
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
