use anyhow::Result;
use sea_orm::Database;
use std::fmt;

use crate::schemas::AppState;

/// Immutable token-signing configuration, built once at startup and carried
/// inside `AppState`. The token issuer and verifier borrow it; there is no
/// process-global secret.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing and verifying bearer tokens.
    pub jwt_secret: String,
}

// Keep the secret out of #[instrument] output and debug logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Initialize application state for the given database URL and signing
/// secret.
pub async fn initialize_app_state_with_url(database_url: &str, jwt_secret: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        auth: AuthConfig {
            jwt_secret: jwt_secret.to_owned(),
        },
    })
}
