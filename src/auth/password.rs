use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher, SaltString};
use rand::rngs::OsRng;

use super::AuthError;
use crate::config::SecurityConfig;

/// Argon2id hasher. Each hash carries its own random salt and parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
    /// Hash with this hasher's parameters, checked when the username is unknown
    dummy_hash: Arc<str>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

const DUMMY_PASSWORD: &str = "todo-list-dummy-password";

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
        )
    }
}

impl Argon2Hasher {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        let mut hasher = Self {
            memory_cost,
            time_cost,
            parallelism,
            dummy_hash: Arc::from(""),
            #[cfg(test)]
            verifications: Arc::default(),
        };
        // Invalid parameters leave it empty; hashing fails for those anyway
        if let Ok(hash) = hasher.hash(DUMMY_PASSWORD) {
            hasher.dummy_hash = Arc::from(hash);
        }
        hasher
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.password_memory_kib, config.password_iterations, 1)
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| AuthError::PasswordHash)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

        // Parameters come from the stored hash, not from this hasher
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Runs [`Self::hash`] on the blocking pool.
    pub async fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }

    /// Runs [`Self::verify`] on the blocking pool.
    pub async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }

    /// Spend one verification against the dummy hash and discard the result,
    /// so a missing account costs as much as a wrong password.
    pub async fn verify_dummy(&self, password: &str) {
        let hash = Arc::clone(&self.dummy_hash);
        self.verify_blocking(password, &hash).await.ok();
    }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}
