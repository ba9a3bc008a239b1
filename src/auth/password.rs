//! Credential Hashing
//! Mission: Salted, slow password digests; plaintext never leaves this module

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt hasher with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. Each call uses a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        hash(plaintext, self.cost).context("Failed to hash password")
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A malformed digest counts as a mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        verify(plaintext, digest).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
