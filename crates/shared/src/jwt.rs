//! JWT claims validation for the auth boundary.
//!
//! Hearth does not issue production tokens; it only validates bearer tokens
//! signed by the identity provider with a shared HS256 secret. Token
//! generation is kept for tests and the development seeder.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Token claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

impl Claims {
    /// Creates claims for a user expiring at the given time.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    /// Returns the user id from the subject claim.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Invalid` if the subject is not a UUID.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::Invalid)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token validation.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Generates a token for a user (tests and the dev seeder only).
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(&self, user_id: Uuid, valid_for: Duration) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, Utc::now() + valid_for);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let service = JwtService::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = service
            .generate_token(user_id, Duration::minutes(15))
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret");

        let token = service
            .generate_token(Uuid::new_v4(), Duration::minutes(-5))
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new("test-secret");
        let other = JwtService::new("other-secret");

        let token = service
            .generate_token(Uuid::new_v4(), Duration::minutes(15))
            .unwrap();

        assert!(other.validate_token(&token).is_err());
    }
}
