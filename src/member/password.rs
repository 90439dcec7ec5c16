// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::member::error::MemberError;

/// Password service for hashing and verification
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    ///
    /// Returns the PHC string (`$argon2id$v=19$...`), which embeds the salt
    /// and parameters needed for verification.
    pub fn hash_password(password: &str) -> Result<String, MemberError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| MemberError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, MemberError> {
        let parsed = PasswordHash::new(hash).map_err(|e| MemberError::PasswordHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(MemberError::PasswordHash(e.to_string())),
        }
    }
}
