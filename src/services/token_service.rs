use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::prelude::*;
use std::fmt;
use uuid::Uuid;

use crate::errors::auth::AuthError;
use crate::services::crypto;
use crate::types::internal::auth::Claims;

/// Access token lifetime in minutes
const ACCESS_TTL_MINUTES: i64 = 15;

/// Refresh token lifetime in days
const REFRESH_TTL_DAYS: i64 = 7;

/// Manages JWT access tokens and opaque refresh tokens
pub struct TokenService {
    jwt_secret: String,
    refresh_token_secret: String,
}

impl TokenService {
    /// Create a new TokenService with the given JWT secret and refresh token secret
    pub fn new(jwt_secret: String, refresh_token_secret: String) -> Self {
        Self {
            jwt_secret,
            refresh_token_secret,
        }
    }

    /// Generate a signed access token for the given user
    pub fn generate_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ACCESS_TTL_MINUTES * 60,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate JWT: {}", e)))
    }

    /// Validate an access token and return its claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::expired_token()
            } else {
                AuthError::invalid_token()
            }
        })?;

        Ok(token_data.claims)
    }

    /// Generate a cryptographically secure refresh token (32 random bytes, base64)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token with HMAC-SHA256 for storage
    pub fn hash_refresh_token(&self, token: &str) -> String {
        crypto::hmac_sha256_token(&self.refresh_token_secret, token)
    }

    /// Expiration timestamp for a refresh token issued now
    pub fn refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + REFRESH_TTL_DAYS * 24 * 60 * 60
    }

    /// Access token lifetime in seconds, for `expires_in` response fields
    pub fn access_ttl_seconds(&self) -> i64 {
        ACCESS_TTL_MINUTES * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}
