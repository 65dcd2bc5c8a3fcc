use bcrypt::{hash, verify};
use thiserror::Error;

use crate::config::DEFAULT_BCRYPT_COST;

#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct HashingError(#[from] bcrypt::BcryptError);

/// Salted, slow one-way hashing of account passwords.
///
/// Digests are bcrypt strings; each one embeds its own random salt and cost,
/// so hashing the same password twice yields different digests that both
/// verify.
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
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        Ok(hash(plaintext, self.cost)?)
    }

    /// Checks `plaintext` against a stored digest.
    ///
    /// A malformed digest is a mismatch, not an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password digest could not be parsed: {}", e);
                false
            }
        }
    }
}
