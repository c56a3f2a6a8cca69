use tracing::{debug, instrument};

use crate::shared::AppError;

/// One-way hashes a password with bcrypt at the given cost.
///
/// CPU bound; callers on the async runtime should go through `spawn_blocking`.
#[instrument(skip(password))]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    debug!("Hashing password");
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Checks a password against a stored bcrypt hash
#[instrument(skip(password, hashed_password))]
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))
}

/// Runs `hash_password` on the blocking thread pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
}

/// Runs `verify_password` on the blocking thread pool
pub async fn verify_password_blocking(
    password: String,
    hashed_password: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?
}
