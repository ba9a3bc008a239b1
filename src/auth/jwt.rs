//! JWT Token Handler
//! Mission: Issue and validate signed, time-limited identity tokens

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // actor id
    pub iat: usize,
    pub exp: usize,
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_days: i64,
}

impl JwtHandler {
    /// Create a handler from the process-wide signing secret
    pub fn new(secret: &str, expiration_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_days,
        }
    }

    /// Generate a token for an actor
    pub fn issue(&self, actor_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::days(self.expiration_days))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: actor_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Issuing JWT for actor {}, expires in {}d",
            actor_id, self.expiration_days
        );

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to generate JWT")
    }

    /// Validate a token and return the actor id it names
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid or expired token")?;

        Uuid::parse_str(&decoded.claims.sub).context("Token subject is not an actor id")
    }
}
