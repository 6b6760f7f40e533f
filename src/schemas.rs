use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use validator::ValidationError;

use crate::config::AuthConfig;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Token-signing configuration, built once at startup.
    pub auth: AuthConfig,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Reject strings that are empty or whitespace-only. Optional fields such as
/// description and category are deliberately not run through this: a blank
/// category is stored as given.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Registers the bearer-token security scheme referenced by the protected
/// paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::locations::get_locations,
        crate::handlers::locations::create_location,
        crate::handlers::locations::update_location,
        crate::handlers::locations::delete_location,
        crate::handlers::polygons::get_polygons,
        crate::handlers::polygons::create_polygon,
        crate::handlers::polygons::update_polygon,
        crate::handlers::polygons::delete_polygon,
        crate::handlers::admin::get_users,
        crate::handlers::admin::create_user,
        crate::handlers::admin::update_user,
        crate::handlers::admin::update_user_role,
        crate::handlers::admin::delete_user,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::TokenResponse,
            crate::handlers::locations::CreateLocationRequest,
            crate::handlers::locations::UpdateLocationRequest,
            crate::handlers::locations::LocationResponse,
            crate::handlers::polygons::CreatePolygonRequest,
            crate::handlers::polygons::UpdatePolygonRequest,
            crate::handlers::polygons::PolygonResponse,
            crate::handlers::admin::CreateUserRequest,
            crate::handlers::admin::UpdateUserRequest,
            crate::handlers::admin::UpdateRoleRequest,
            crate::handlers::admin::UserResponse,
            model::entities::user::Role,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "locations", description = "Point markers owned by users"),
        (name = "polygons", description = "User-drawn parcels with area metrics"),
        (name = "admin", description = "Admin-only account management"),
    ),
    info(
        title = "Geomark API",
        description = "Geospatial note-taking API - authenticated users place map markers and draw parcels; admins manage accounts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
