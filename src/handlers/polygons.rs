use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::site_polygon;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::policy::{self, Actor, ListScope};
use crate::error::ApiError;
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating a new parcel. Area and perimeter are computed
/// by the map client from the drawn geometry; beyond a non-negativity
/// check the server never recomputes them or validates them against the
/// GeoJSON.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePolygonRequest {
    /// Parcel name
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub name: String,
    /// Serialized GeoJSON Polygon Feature, single caller-closed outer ring
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub geo_json: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Surface area in square metres, non-negative
    #[validate(range(min = 0.0))]
    pub area_sq_m: f64,
    /// Surface area in hectares (area_sq_m / 10000 by convention)
    #[validate(range(min = 0.0))]
    pub area_hectares: f64,
    /// Outer ring length in metres
    #[validate(range(min = 0.0))]
    pub perimeter_meters: f64,
}

/// Request body for updating a parcel. The GeoJSON geometry and the owner
/// stamp are immutable after creation; the metric fields travel with the
/// name because the client resubmits them together.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePolygonRequest {
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub area_sq_m: f64,
    #[validate(range(min = 0.0))]
    pub area_hectares: f64,
    #[validate(range(min = 0.0))]
    pub perimeter_meters: f64,
}

/// Parcel response model
#[derive(Debug, Serialize, ToSchema)]
pub struct PolygonResponse {
    pub id: i32,
    pub name: String,
    pub geo_json: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub area_sq_m: f64,
    pub area_hectares: f64,
    pub perimeter_meters: f64,
    pub created_by_user_id: i32,
}

impl From<site_polygon::Model> for PolygonResponse {
    fn from(model: site_polygon::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            geo_json: model.geo_json,
            description: model.description,
            category: model.category,
            area_sq_m: model.area_sq_m,
            area_hectares: model.area_hectares,
            perimeter_meters: model.perimeter_meters,
            created_by_user_id: model.created_by_user_id,
        }
    }
}

/// List all parcels
#[utoipa::path(
    get,
    path = "/api/polygons",
    tag = "polygons",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Every parcel, regardless of owner", body = Vec<PolygonResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_polygons(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<PolygonResponse>>, ApiError> {
    trace!("Entering get_polygons function");

    // Parcel lists are globally visible; the scope call keeps the policy
    // decision in one place even though it never filters today.
    debug_assert_eq!(policy::parcel_list_scope(&actor), ListScope::All);

    let records = site_polygon::Entity::find().all(&state.db).await?;
    info!(
        "Returning {} parcels to user '{}' (id {})",
        records.len(),
        actor.username,
        actor.id
    );

    Ok(Json(records.into_iter().map(PolygonResponse::from).collect()))
}

/// Create a new parcel owned by the caller
#[utoipa::path(
    post,
    path = "/api/polygons",
    tag = "polygons",
    security(("bearer_token" = [])),
    request_body = CreatePolygonRequest,
    responses(
        (status = 201, description = "Parcel created successfully", body = PolygonResponse),
        (status = 400, description = "Blank name or geo_json", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_polygon(
    State(state): State<AppState>,
    actor: Actor,
    Valid(Json(request)): Valid<Json<CreatePolygonRequest>>,
) -> Result<(StatusCode, Json<PolygonResponse>), ApiError> {
    trace!("Entering create_polygon function");
    debug!(
        "Creating parcel '{}' ({} sq m) for user id {}",
        request.name, request.area_sq_m, actor.id
    );

    let new_polygon = site_polygon::ActiveModel {
        name: Set(request.name.trim().to_string()),
        geo_json: Set(request.geo_json),
        description: Set(request.description),
        category: Set(request.category),
        area_sq_m: Set(request.area_sq_m),
        area_hectares: Set(request.area_hectares),
        perimeter_meters: Set(request.perimeter_meters),
        created_by_user_id: Set(actor.id),
        ..Default::default()
    };

    let polygon_model = new_polygon.insert(&state.db).await?;
    info!(
        "Parcel created with ID: {}, name: {}, owner: {}",
        polygon_model.id, polygon_model.name, polygon_model.created_by_user_id
    );

    Ok((StatusCode::CREATED, Json(PolygonResponse::from(polygon_model))))
}

/// Update a parcel's mutable fields
#[utoipa::path(
    put,
    path = "/api/polygons/{id}",
    tag = "polygons",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "Parcel ID"),
    ),
    request_body = UpdatePolygonRequest,
    responses(
        (status = 200, description = "Parcel updated successfully", body = PolygonResponse),
        (status = 403, description = "Caller does not own this parcel", body = ErrorResponse),
        (status = 404, description = "Parcel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_polygon(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    actor: Actor,
    Valid(Json(request)): Valid<Json<UpdatePolygonRequest>>,
) -> Result<Json<PolygonResponse>, ApiError> {
    trace!("Entering update_polygon function for id: {}", id);

    let Some(existing) = site_polygon::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("Parcel with ID {} not found for update", id);
        return Err(ApiError::NotFound("Parcel not found."));
    };

    // Owner-only, admins included: see the policy module.
    if !policy::can_modify_parcel(&actor, existing.created_by_user_id) {
        warn!(
            "User '{}' (id {}) denied update on parcel {} owned by {}",
            actor.username, actor.id, id, existing.created_by_user_id
        );
        return Err(ApiError::Forbidden("You do not own this parcel."));
    }

    // The stored GeoJSON and owner stamp stay untouched.
    let mut polygon_active: site_polygon::ActiveModel = existing.into();
    polygon_active.name = Set(request.name.trim().to_string());
    polygon_active.description = Set(request.description);
    polygon_active.category = Set(request.category);
    polygon_active.area_sq_m = Set(request.area_sq_m);
    polygon_active.area_hectares = Set(request.area_hectares);
    polygon_active.perimeter_meters = Set(request.perimeter_meters);

    let updated = polygon_active.update(&state.db).await?;
    info!("Parcel with ID {} updated by user id {}", id, actor.id);

    Ok(Json(PolygonResponse::from(updated)))
}

/// Delete a parcel
#[utoipa::path(
    delete,
    path = "/api/polygons/{id}",
    tag = "polygons",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "Parcel ID"),
    ),
    responses(
        (status = 204, description = "Parcel deleted"),
        (status = 403, description = "Caller does not own this parcel", body = ErrorResponse),
        (status = 404, description = "Parcel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_polygon(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_polygon function for id: {}", id);

    let Some(existing) = site_polygon::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("Parcel with ID {} not found for deletion", id);
        return Err(ApiError::NotFound("Parcel not found."));
    };

    if !policy::can_modify_parcel(&actor, existing.created_by_user_id) {
        warn!(
            "User '{}' (id {}) denied delete on parcel {} owned by {}",
            actor.username, actor.id, id, existing.created_by_user_id
        );
        return Err(ApiError::Forbidden("You do not own this parcel."));
    }

    existing.delete(&state.db).await?;
    info!("Parcel with ID {} deleted by user id {}", id, actor.id);

    Ok(StatusCode::NO_CONTENT)
}
