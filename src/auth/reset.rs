//! Password Reset Tokens
//! Mission: One-time, short-lived reset tokens stored only as digests

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::auth::models::User;

/// A freshly issued reset token.
///
/// `plain` goes to the requester; only `digest` and `expires_at` are persisted.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub plain: String,
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a 160-bit random reset token valid for `window`
pub fn issue_reset_token(window: Duration) -> ResetToken {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plain = hex::encode(bytes);

    ResetToken {
        digest: digest_reset_token(&plain),
        plain,
        expires_at: Utc::now() + window,
    }
}

/// Deterministic SHA-256 digest (hex) of a raw reset token
pub fn digest_reset_token(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

/// Out-of-band channel that hands the reset link to the actor (mail, SMS, ...)
#[async_trait]
pub trait ResetDelivery: Send + Sync {
    async fn deliver(&self, user: &User, reset_url: &str) -> Result<()>;
}

/// Default delivery: records that a link went out, without the link itself
pub struct LogDelivery;

#[async_trait]
impl ResetDelivery for LogDelivery {
    async fn deliver(&self, user: &User, _reset_url: &str) -> Result<()> {
        info!("✉️  Password reset link issued for {}", user.user_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_reset_token_shape() {
        let token = issue_reset_token(Duration::minutes(10));

        assert_eq!(token.plain.len(), 40);
        assert_eq!(token.digest.len(), 64);
        assert_ne!(token.plain, token.digest);
        assert!(token.expires_at > Utc::now() + Duration::minutes(9));
        assert!(token.expires_at <= Utc::now() + Duration::minutes(10));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = issue_reset_token(Duration::minutes(10));
        let b = issue_reset_token(Duration::minutes(10));
        assert_ne!(a.plain, b.plain);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_digest_is_stable_and_matches() {
        let token = issue_reset_token(Duration::minutes(10));
        assert_eq!(digest_reset_token(&token.plain), token.digest);
        assert_ne!(digest_reset_token("someone-else"), token.digest);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            digest_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
