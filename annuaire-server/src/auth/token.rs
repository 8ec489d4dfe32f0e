//! Access token issuing and validation.
//!
//! Tokens are HS256 JWTs signed with the configured secret. The subject is
//! the user's numeric id encoded as a string, so the authorization check in
//! handlers stays a plain integer comparison.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID, stringified
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // Unique token ID
}

/// Signs and validates access tokens with a fixed secret and lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Configured token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.num_seconds().max(0) as u64
    }

    /// Issue a token for the given user.
    pub fn generate(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Decode and verify a token, returning its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}
