//! JWT Token Service
//!
//! Issues and verifies the HS256 bearer tokens that bind a request to a user.
//! Tokens are stateless: nothing is stored server-side, and a token stays
//! valid until it expires or the signing secret is rotated.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Issuer claim stamped on every token
pub const TOKEN_ISSUER: &str = "taskboard-server";

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User unique identifier
    pub sub: Uuid,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// A freshly signed token and when it stops being accepted
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with the provided secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
        }
    }

    /// Sign a token for `subject`
    pub fn issue(&self, subject: Uuid) -> Result<IssuedToken> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("Token expiry is out of range")?;

        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode JWT token")?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Verify signature, issuer and expiry, returning the subject
    pub fn verify(&self, token: &str) -> AuthResult<Uuid> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "JWT validation failed");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_A: &str = "secret-a-0123456789abcdef0123456789";
    const SECRET_B: &str = "secret-b-0123456789abcdef0123456789";

    fn service(secret: &str) -> JwtService {
        JwtService::new(secret, Duration::hours(24))
    }

    #[test]
    fn test_jwt_roundtrip() {
        let jwt_service = service(SECRET_A);
        let user_id = Uuid::new_v4();

        let issued = jwt_service.issue(user_id).unwrap();

        assert_eq!(jwt_service.verify(&issued.token).unwrap(), user_id);
        assert_eq!(issued.expires_in, 24 * 60 * 60);
    }

    #[test]
    fn other_secret_is_rejected() {
        let issued = service(SECRET_A).issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            service(SECRET_B).verify(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn any_single_bit_flip_is_rejected() {
        let jwt_service = service(SECRET_A);
        let token = jwt_service.issue(Uuid::new_v4()).unwrap().token;

        for index in 0..token.len() {
            for bit in 0..7 {
                let mut bytes = token.clone().into_bytes();
                bytes[index] ^= 1 << bit;
                let Ok(mutated) = String::from_utf8(bytes) else {
                    continue;
                };
                assert!(
                    jwt_service.verify(&mutated).is_err(),
                    "flip of bit {} at byte {} was accepted",
                    bit,
                    index
                );
            }
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtService::new(SECRET_A, Duration::seconds(-60));
        let issued = expired.issue(Uuid::new_v4()).unwrap();
        assert!(expired.verify(&issued.token).is_err());
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let jwt_service = JwtService::new(SECRET_A, Duration::seconds(10_000_000_000_000));
        assert!(jwt_service.issue(Uuid::new_v4()).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now,
            exp: now + 3600,
            iss: "someone-else".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET_A.as_bytes()),
        )
        .unwrap();

        assert!(service(SECRET_A).verify(&token).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let jwt_service = service(SECRET_A);
        for token in ["", "abc", "a.b.c", "a.b.c.d"] {
            assert!(jwt_service.verify(token).is_err());
        }
    }
}
