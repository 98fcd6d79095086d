// auth/password.rs - Salted, deliberately slow password hashing (Argon2id)

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::sync::Arc;

use super::AuthError;
use crate::config::SecurityConfig;

/// Plaintext used to produce the hash verified when a claimed name does not exist
const TIMING_PARITY_SECRET: &str = "redoot-timing-parity";

#[derive(Clone)]
pub struct PasswordHashing {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswordHashing {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        let mut hashing = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hashing.dummy_hash = Arc::from(hashing.hash(TIMING_PARITY_SECRET)?);
        Ok(hashing)
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(
            security.argon2_memory_kib,
            security.argon2_iterations,
            security.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Produces a PHC string carrying its own salt and parameters
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Constant-time comparison; malformed hashes never verify
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2().verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Burns the same work as a real verification against a hash that cannot match
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_hash);
        false
    }

    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Runs verification off the async executor. `None` hash means the account does not exist.
    pub async fn verify_blocking(&self, plaintext: String, hash: Option<String>) -> Result<bool, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hashing.verify(&plaintext, &hash),
            None => hashing.verify_dummy(&plaintext),
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
