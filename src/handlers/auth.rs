use axum::{extract::State, response::Json};
use axum_valid::Valid;
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{password, token};
use crate::error::{conflict_on_unique, ApiError};
use crate::schemas::{AppState, ErrorResponse};

/// Request body for registration
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub username: String,
    /// Plaintext password; only its bcrypt hash is ever stored
    #[validate(custom(function = "crate::schemas::validate_not_blank"))]
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token issued on successful registration or login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account and log it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, token issued", body = TokenResponse),
        (status = 400, description = "Blank field or username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<Json<TokenResponse>, ApiError> {
    trace!("Entering register function");
    debug!("Registering user with username: {}", request.username);

    // Advisory pre-check for a friendlier error; the unique index on
    // username is what actually closes the concurrent-registration race.
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Registration rejected, username '{}' already exists", request.username);
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password::hash_password(&request.password)?),
        role: Set(Role::User),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    let user_model = new_user
        .insert(&state.db)
        .await
        .map_err(|db_error| conflict_on_unique(db_error, "User already exists"))?;

    info!(
        "User registered with ID: {}, username: {}",
        user_model.id, user_model.username
    );
    let token = token::issue(&state.auth, user_model.id, &user_model.username, user_model.role)?;
    Ok(Json(TokenResponse { token }))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    trace!("Entering login function");
    debug!("Login attempt for username: {}", request.username);

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;

    // Unknown username and wrong password are indistinguishable to the
    // caller.
    let Some(user_model) = user_model else {
        warn!("Login failed for unknown username '{}'", request.username);
        return Err(ApiError::Unauthenticated("Invalid username or password"));
    };

    if !password::verify_password(&request.password, &user_model.password_hash) {
        warn!("Login failed for username '{}': wrong password", request.username);
        return Err(ApiError::Unauthenticated("Invalid username or password"));
    }

    info!("User '{}' (id {}) logged in", user_model.username, user_model.id);
    let token = token::issue(&state.auth, user_model.id, &user_model.username, user_model.role)?;
    Ok(Json(TokenResponse { token }))
}
