//! Password hashing and invitation-token digests.
//!
//! Passwords are hashed with argon2id and a per-password salt. Invitation
//! tokens are issued to the user in cleartext exactly once; only the
//! SHA-256 hex digest is ever stored or compared.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use crate::domain::Error;

/// Hash a cleartext password for storage.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// Check a cleartext password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// One-way digest of an invitation token, hex encoded.
pub fn token_digest(plain_token: &str) -> String {
    hex::encode(Sha256::digest(plain_token.as_bytes()))
}
