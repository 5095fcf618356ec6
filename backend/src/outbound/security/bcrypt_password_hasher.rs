//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is deliberately slow, so hashing and verification run on Tokio's
//! blocking pool rather than on the request executor.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// Password hasher using bcrypt with a configurable cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let plain = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain.as_bytes(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plain = Zeroizing::new(password.expose().to_owned());
        let stored = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plain.as_bytes(), &stored))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }
}
