//! Password hashing for directory accounts.
//!
//! Wraps Argon2id behind a small service so the cost parameters come from
//! runtime configuration instead of being frozen at the call sites.
//! Verification reads the parameters embedded in the stored PHC string, so
//! raising the configured cost never invalidates existing hashes.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Failures from hashing operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The configured cost parameters are out of range.
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),

    /// Hashing itself failed.
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hashes and verifies passwords with a fixed set of cost parameters.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from the given cost parameters.
    pub fn new(params: &HashParams) -> Result<Self, CryptoError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(CryptoError::Params)?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(CryptoError::Hash)?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string.
    ///
    /// A stored hash that cannot be parsed can never match, so malformed
    /// input yields `false` rather than an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
