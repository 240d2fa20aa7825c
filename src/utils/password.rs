use bcrypt::{hash, verify};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::utils::error::AppError;

/// bcrypt work factor used for every stored password.
pub const BCRYPT_COST: u32 = 10;

/// Hashes a password on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored bcrypt hash on the blocking pool.
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    let result = tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))?;

    match result {
        Ok(valid) => Ok(valid),
        Err(e) => {
            log::warn!("⚠️  Stored password hash could not be verified: {}", e);
            Ok(false)
        }
    }
}

/// Random alphanumeric token, used for password reset links.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
