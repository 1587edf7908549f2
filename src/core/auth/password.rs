//! Password hashing with bcrypt
//!
//! bcrypt is deliberately slow, so both hashing and verification are moved
//! onto tokio's blocking pool instead of running on a runtime worker.

use crate::core::config::DEFAULT_BCRYPT_COST;

/// Lowest cost factor accepted for stored hashes
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest cost factor bcrypt supports
const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt only looks at the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Salted one-way password hasher
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    /// Create a hasher with the given cost, raised to `MIN_BCRYPT_COST` if lower
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password. Every call uses a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;

        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(digest)
    }

    /// Verify a password against a stored bcrypt hash
    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let digest = digest.to_owned();

        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest)).await??;
        Ok(matches)
    }
}
