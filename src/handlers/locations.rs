use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::location;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::policy::{self, Actor, ListScope};
use crate::error::ApiError;
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating a new location
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateLocationRequest {
    /// Marker name
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub name: String,
    /// Degrees north, [-90, 90]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Degrees east, [-180, 180]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Free-text note; stored as given, even when blank
    pub description: Option<String>,
    /// Free-text category; stored as given, even when blank
    pub category: Option<String>,
}

/// Request body for updating a location. Coordinates and owner are
/// immutable after creation and therefore absent here.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateLocationRequest {
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Location response model
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by_user_id: i32,
}

impl From<location::Model> for LocationResponse {
    fn from(model: location::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            latitude: model.latitude,
            longitude: model.longitude,
            description: model.description,
            category: model.category,
            created_by_user_id: model.created_by_user_id,
        }
    }
}

/// List locations visible to the caller
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "locations",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Locations visible to the caller (owner-filtered unless admin)", body = Vec<LocationResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_locations(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<LocationResponse>>, ApiError> {
    trace!("Entering get_locations function");

    let mut query = location::Entity::find();
    // Out-of-scope records are filtered out rather than rejected.
    if let ListScope::OwnedBy(owner_id) = policy::location_list_scope(&actor) {
        debug!("Filtering location list to owner id {}", owner_id);
        query = query.filter(location::Column::CreatedByUserId.eq(owner_id));
    }

    let records = query.all(&state.db).await?;
    info!(
        "Returning {} locations for user '{}' (id {})",
        records.len(),
        actor.username,
        actor.id
    );

    Ok(Json(records.into_iter().map(LocationResponse::from).collect()))
}

/// Create a new location owned by the caller
#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "locations",
    security(("bearer_token" = [])),
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created successfully", body = LocationResponse),
        (status = 400, description = "Blank name or out-of-range coordinates", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_location(
    State(state): State<AppState>,
    actor: Actor,
    Valid(Json(request)): Valid<Json<CreateLocationRequest>>,
) -> Result<(StatusCode, Json<LocationResponse>), ApiError> {
    trace!("Entering create_location function");
    debug!(
        "Creating location '{}' at ({}, {}) for user id {}",
        request.name, request.latitude, request.longitude, actor.id
    );

    let new_location = location::ActiveModel {
        name: Set(request.name.trim().to_string()),
        latitude: Set(request.latitude),
        longitude: Set(request.longitude),
        description: Set(request.description),
        category: Set(request.category),
        created_by_user_id: Set(actor.id),
        ..Default::default()
    };

    let location_model = new_location.insert(&state.db).await?;
    info!(
        "Location created with ID: {}, name: {}, owner: {}",
        location_model.id, location_model.name, location_model.created_by_user_id
    );

    Ok((StatusCode::CREATED, Json(LocationResponse::from(location_model))))
}

/// Update a location's mutable fields
#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = "locations",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "Location ID"),
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated successfully", body = LocationResponse),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_location(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    actor: Actor,
    Valid(Json(request)): Valid<Json<UpdateLocationRequest>>,
) -> Result<Json<LocationResponse>, ApiError> {
    trace!("Entering update_location function for id: {}", id);

    let Some(existing) = location::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("Location with ID {} not found for update", id);
        return Err(ApiError::NotFound("Location not found."));
    };

    if !policy::can_modify_location(&actor, existing.created_by_user_id) {
        warn!(
            "User '{}' (id {}) denied update on location {} owned by {}",
            actor.username, actor.id, id, existing.created_by_user_id
        );
        return Err(ApiError::Forbidden("You do not own this location."));
    }

    // Coordinates and owner stamp stay untouched.
    let mut location_active: location::ActiveModel = existing.into();
    location_active.name = Set(request.name.trim().to_string());
    location_active.description = Set(request.description);
    location_active.category = Set(request.category);

    let updated = location_active.update(&state.db).await?;
    info!("Location with ID {} updated by user id {}", id, actor.id);

    Ok(Json(LocationResponse::from(updated)))
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "locations",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "Location ID"),
    ),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_location(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_location function for id: {}", id);

    let Some(existing) = location::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("Location with ID {} not found for deletion", id);
        return Err(ApiError::NotFound("Location not found."));
    };

    if !policy::can_modify_location(&actor, existing.created_by_user_id) {
        warn!(
            "User '{}' (id {}) denied delete on location {} owned by {}",
            actor.username, actor.id, id, existing.created_by_user_id
        );
        return Err(ApiError::Forbidden("You do not own this location."));
    }

    existing.delete(&state.db).await?;
    info!("Location with ID {} deleted by user id {}", id, actor.id);

    Ok(StatusCode::NO_CONTENT)
}
