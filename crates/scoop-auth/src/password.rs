//! Password hashing
//!
//! Argon2id via the `password_hash` API. Hashes are self-describing
//! strings; verification parses whatever parameters the stored hash was
//! created with.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AuthError;

/// Hash a plaintext password with a fresh salt
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored hash.
///
/// An unparsable stored hash verifies as false rather than erroring; the
/// caller cannot distinguish it from a wrong password, which is the
/// intended collapse.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pistachio-gelato-9").unwrap();
        assert!(verify_password("pistachio-gelato-9", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }
}
