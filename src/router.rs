use crate::handlers::{
    admin::{create_user, delete_user, get_users, update_user, update_user_role},
    auth::{login, register},
    health::health_check,
    locations::{create_location, delete_location, get_locations, update_location},
    polygons::{create_polygon, delete_polygon, get_polygons, update_polygon},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Registration and login
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Location CRUD routes
        .route("/api/locations", post(create_location))
        .route("/api/locations", get(get_locations))
        .route("/api/locations/:id", put(update_location))
        .route("/api/locations/:id", delete(delete_location))
        // Parcel CRUD routes
        .route("/api/polygons", post(create_polygon))
        .route("/api/polygons", get(get_polygons))
        .route("/api/polygons/:id", put(update_polygon))
        .route("/api/polygons/:id", delete(delete_polygon))
        // Admin account management
        .route("/api/admin/users", get(get_users))
        .route("/api/admin/users", post(create_user))
        .route("/api/admin/users/:id", put(update_user))
        .route("/api/admin/users/:id", delete(delete_user))
        .route("/api/admin/users/:id/role", put(update_user_role))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
