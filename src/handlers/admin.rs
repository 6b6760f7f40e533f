use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{location, site_polygon, user};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::extract::AdminActor;
use crate::auth::password;
use crate::error::{conflict_on_unique, ApiError};
use crate::schemas::{AppState, ErrorResponse};

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub username: String,
    /// Plaintext password; only its bcrypt hash is ever stored
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub password: String,
    /// Role, "User" or "Admin". Defaults to "User" when omitted.
    pub role: Option<String>,
}

/// Request body for updating a user. Omitted or blank fields are left
/// unchanged; a provided password is re-hashed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Request body for changing a user's role only
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// "User" or "Admin"
    pub role: String,
}

/// User response model. Deliberately a projection: the password hash never
/// leaves this boundary.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: user::Role,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
        }
    }
}

fn parse_role(value: &str) -> Result<user::Role, ApiError> {
    user::Role::try_from_value(&value.to_string()).map_err(|_| {
        ApiError::BadRequest("Invalid role. Must be 'User' or 'Admin'.".to_string())
    })
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Users retrieved successfully", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    trace!("Entering get_users function");
    debug!("Admin '{}' listing all users", actor.username);

    let users = user::Entity::find().all(&state.db).await?;
    info!("Returning {} users to admin '{}'", users.len(), actor.username);

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_token" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Blank field, invalid role, or username already exists", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<Json<UserResponse>, ApiError> {
    trace!("Entering create_user function");
    debug!(
        "Admin '{}' creating user with username: {}",
        actor.username, request.username
    );

    let role = match request.role.as_deref() {
        Some(value) => parse_role(value)?,
        None => user::Role::User,
    };

    // Advisory pre-check; the unique index closes the race.
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Username '{}' already exists", request.username);
        return Err(ApiError::Conflict("Username already exists.".to_string()));
    }

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password::hash_password(&request.password)?),
        role: Set(role),
        ..Default::default()
    };

    let user_model = new_user
        .insert(&state.db)
        .await
        .map_err(|db_error| conflict_on_unique(db_error, "Username already exists."))?;

    info!(
        "User created with ID: {}, username: {} by admin '{}'",
        user_model.id, user_model.username, actor.username
    );

    Ok(Json(UserResponse::from(user_model)))
}

/// Update a user's username, password, and/or role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    trace!("Entering update_user function for user_id: {}", id);

    let Some(existing) = user::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("User with ID {} not found for update", id);
        return Err(ApiError::NotFound("User not found."));
    };

    let mut user_active: user::ActiveModel = existing.into();

    // Omitted or blank fields are left unchanged.
    if let Some(username) = request.username.filter(|value| !value.trim().is_empty()) {
        debug!("Updating username of user {} to: {}", id, username);
        user_active.username = Set(username);
    }
    if let Some(new_password) = request.password.filter(|value| !value.trim().is_empty()) {
        debug!("Re-hashing password for user {}", id);
        user_active.password_hash = Set(password::hash_password(&new_password)?);
    }
    if let Some(role) = request.role.filter(|value| !value.trim().is_empty()) {
        let role = parse_role(&role)?;
        debug!("Updating role of user {} to: {:?}", id, role);
        user_active.role = Set(role);
    }

    let updated = user_active
        .update(&state.db)
        .await
        .map_err(|db_error| conflict_on_unique(db_error, "Username already exists."))?;
    info!("User with ID {} updated by admin '{}'", id, actor.username);

    Ok(Json(UserResponse::from(updated)))
}

/// Change a user's role only
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    tag = "admin",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated successfully", body = UserResponse),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user_role(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    trace!("Entering update_user_role function for user_id: {}", id);

    // Validate the role before touching the database so an unknown role
    // string can never reach storage.
    let role = parse_role(&request.role)?;

    let Some(existing) = user::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("User with ID {} not found for role update", id);
        return Err(ApiError::NotFound("User not found."));
    };

    let mut user_active: user::ActiveModel = existing.into();
    user_active.role = Set(role);

    let updated = user_active.update(&state.db).await?;
    info!(
        "Role of user {} set to {:?} by admin '{}'",
        id, updated.role, actor.username
    );

    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user together with all records they own
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_token" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User and all owned records deleted"),
        (status = 400, description = "Attempted self-deletion", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_user function for user_id: {}", id);

    // Admins may never delete their own account, regardless of role.
    if id == actor.id {
        warn!("Admin '{}' attempted to delete their own account", actor.username);
        return Err(ApiError::InvalidOperation("Admins cannot delete themselves."));
    }

    let Some(_existing) = user::Entity::find_by_id(id).one(&state.db).await? else {
        warn!("User with ID {} not found for deletion", id);
        return Err(ApiError::NotFound("User not found."));
    };

    // One transaction for the whole cascade: a failure partway leaves the
    // user and all their records intact, never an orphaned state.
    let txn = state.db.begin().await?;

    let locations_deleted = location::Entity::delete_many()
        .filter(location::Column::CreatedByUserId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let polygons_deleted = site_polygon::Entity::delete_many()
        .filter(site_polygon::Column::CreatedByUserId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    user::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        "User {} deleted by admin '{}' along with {} locations and {} parcels",
        id, actor.username, locations_deleted, polygons_deleted
    );

    Ok(StatusCode::NO_CONTENT)
}
