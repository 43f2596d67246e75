//! # Password Hashing
//!
//! One-way hashing and constant-time verification of user passwords using
//! Argon2id with the crate's default cost parameters. The produced hash is
//! a self-describing PHC string (algorithm, parameters, and salt embedded).
//!
//! These are pure functions over byte strings; password policy (minimum
//! length and so on) is enforced upstream in `lib-utils::validation`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PwdError {
    #[error("failed to hash password")]
    HashFailed,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PwdError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PwdError::HashFailed)?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against a stored PHC hash string.
///
/// A mismatch is `Ok(false)`; only a hash that cannot be interpreted at all
/// is an error. Comparison happens inside Argon2 and does not leak timing
/// correlated with a partial match.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PwdError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PwdError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PwdError::MalformedHash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let password = "TestPassword123!";
        let hash = hash_password(password).expect("hashing should succeed");

        assert!(verify_password(password, &hash).expect("verification should run"));
        assert!(!verify_password("WrongPassword", &hash).expect("verification should run"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);

        assert!(verify_password("same-password", &first).unwrap());
        assert!(verify_password("same-password", &second).unwrap());
    }

    #[test]
    fn test_hash_is_self_describing() {
        let hash = hash_password("TestPassword123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_hash_is_error_not_panic() {
        let result = verify_password("anything", "not-a-phc-string");
        assert_eq!(result, Err(PwdError::MalformedHash));
    }
}
