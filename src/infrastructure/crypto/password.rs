//! Password hashing utilities
//!
//! bcrypt truncates its input at 72 bytes, so the plaintext is first reduced
//! to a fixed-size SHA-256 hex digest. Passwords of any length hash and
//! verify identically.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use sha2::{Digest, Sha256};

fn normalize(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Hash a password using bcrypt over its SHA-256 digest
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(normalize(password), DEFAULT_COST)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(normalize(password), hashed)
}
