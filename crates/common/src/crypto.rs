//! Password hashing utilities.
//!
//! Passwords are only ever persisted as salted Argon2 hashes; authentication
//! compares a candidate password against the stored hash.
//!
//! # Examples
//!
//! ```
//! use chirp_common::crypto::{hash_password, verify_password};
//!
//! let hash = hash_password("hunter22").expect("hashing failed");
//! assert!(hash.starts_with("$argon2"));
//! assert!(verify_password("hunter22", &hash).expect("verify failed"));
//! assert!(!verify_password("hunter23", &hash).expect("verify failed"));
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{AppError, AppResult};

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
