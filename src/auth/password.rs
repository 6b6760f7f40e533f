use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::ApiError;

/// Hash a plaintext password. The bcrypt output embeds salt and cost, so it
/// is the only value that ever needs storing.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    hash(plain, DEFAULT_COST).map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Check a plaintext password against a stored hash. A malformed stored
/// hash counts as a mismatch rather than an error: the caller only ever
/// needs yes or no.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}
