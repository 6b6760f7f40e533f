#[cfg(test)]
pub mod test_utils {
    use crate::auth::{password, token};
    use crate::config::AuthConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user::{self, Role};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        AppState {
            db,
            auth: AuthConfig {
                jwt_secret: "integration-test-secret".to_string(),
            },
        }
    }

    /// Insert a user directly, bypassing the HTTP surface. Used to seed
    /// admins, which registration can never produce.
    pub async fn seed_user(state: &AppState, username: &str, plain_password: &str, role: Role) -> user::Model {
        let new_user = user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password::hash_password(plain_password).expect("Failed to hash password")),
            role: Set(role),
            ..Default::default()
        };

        new_user
            .insert(&state.db)
            .await
            .expect("Failed to seed test user")
    }

    /// Mint a bearer token for a seeded user without going through login.
    pub fn token_for(state: &AppState, user_model: &user::Model) -> String {
        token::issue(&state.auth, user_model.id, &user_model.username, user_model.role)
            .expect("Failed to issue test token")
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Create axum app for testing, returning the state alongside so tests
    /// can seed users or inspect rows directly.
    pub async fn setup_test_app_with_state() -> (Router, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state)
    }
}
