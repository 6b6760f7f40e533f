use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Failure taxonomy surfaced to API clients. Every variant maps to a status
/// code and a short human-readable message; nothing is retried
/// automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, expired, or badly signed token, or bad
    /// credentials at login.
    #[error("{0}")]
    Unauthenticated(&'static str),
    /// Authenticated but not permitted by the ownership policy.
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    /// Duplicate username. Surfaced as 400 to match the existing client
    /// contract, not 409.
    #[error("{0}")]
    Conflict(String),
    /// A structurally valid request the service refuses on principle, such
    /// as an admin deleting their own account.
    #[error("{0}")]
    InvalidOperation(&'static str),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Conflict(_) | Self::InvalidOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidOperation(_) => "INVALID_OPERATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Storage and internal failures are logged in full but never
            // leak details to the caller.
            Self::Database(db_error) => {
                error!("Database error: {}", db_error);
                "Internal server error".to_string()
            }
            Self::Internal(detail) => {
                error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
            success: false,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Map an insert failure to `Conflict` when the database reports a unique
/// constraint violation, so a registration race lost at the index still
/// surfaces as a duplicate-username error rather than a 500.
pub fn conflict_on_unique(db_error: DbErr, message: &str) -> ApiError {
    let text = db_error.to_string().to_lowercase();
    if text.contains("unique") || text.contains("constraint") {
        ApiError::Conflict(message.to_string())
    } else {
        ApiError::Database(db_error)
    }
}
