use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::auth::policy::{self, Actor};
use crate::auth::token;
use crate::error::ApiError;
use crate::schemas::AppState;

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated("Missing bearer token"))?;

        let bearer = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated("Missing bearer token"))?;

        let claims = token::verify(&state.auth, bearer)?;

        Ok(Actor {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// An actor already proven to hold the admin role. Admin-only handlers take
/// this instead of re-checking the role inline.
#[derive(Debug)]
pub struct AdminActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AdminActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;

        if !policy::can_manage_users(&actor) {
            warn!(
                "User '{}' (id {}) attempted an admin operation",
                actor.username, actor.id
            );
            return Err(ApiError::Forbidden("Admin role required"));
        }

        Ok(AdminActor(actor))
    }
}
