use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Token lifetime. A leaked token stays valid for at most this long; there
/// is no revocation list, so compromise is bounded by expiry alone.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Claims embedded in every bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    pub username: String,
    pub role: Role,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Mint a bearer token for the given user. Stateless: nothing is recorded
/// server-side.
pub fn issue(config: &AuthConfig, id: i32, username: &str, role: Role) -> Result<String, ApiError> {
    let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
    let claims = Claims {
        sub: id,
        username: username.to_owned(),
        role,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// Validate a bearer token and return its claims. Malformed, expired, and
/// badly signed tokens are all collapsed into `Unauthenticated`; the precise
/// reason is logged, never surfaced.
pub fn verify(config: &AuthConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        ApiError::Unauthenticated("Invalid or expired token")
    })
}
