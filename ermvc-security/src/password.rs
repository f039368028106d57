//! Password hashing with argon2.
//!
//! Both operations run on the blocking thread pool.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::SecurityError;

/// Hash `plain` into a PHC string (`$argon2id$v=19$...`).
pub async fn hash_password(plain: &str) -> Result<String, SecurityError> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || hash_password_blocking(&plain))
        .await
        .map_err(|e| SecurityError::Hash(e.to_string()))?
}

/// Check `plain` against a stored hash.
///
/// A mismatch is `Ok(false)`; a malformed hash is an error.
pub async fn verify_password(plain: &str, hash: &str) -> Result<bool, SecurityError> {
    let plain = plain.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password_blocking(&plain, &hash))
        .await
        .map_err(|e| SecurityError::Hash(e.to_string()))?
}

pub fn hash_password_blocking(plain: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SecurityError::Hash(e.to_string()))
}

pub fn verify_password_blocking(plain: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|e| SecurityError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
