//! Authentication Models
//!
//! Request/response schemas for the auth endpoints and the identity bound to
//! an authenticated request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::UserIdentity;
use crate::error::{AuthError, AuthResult};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PASSWORD_LEN: usize = 128;

/// Authenticated user resolved by the identity middleware
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserIdentity> for AuthUser {
    fn from(identity: UserIdentity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
        }
    }
}

/// Signup request payload
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Check field shapes and return the normalized `(name, email)` pair
    pub fn validate(&self) -> AuthResult<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(AuthError::Validation("name".into()));
        }

        let email = normalize_email(&self.email);
        if !is_plausible_email(&email) {
            return Err(AuthError::Validation("email".into()));
        }

        if self.password.is_empty() || self.password.chars().count() > MAX_PASSWORD_LEN {
            return Err(AuthError::Validation("password".into()));
        }

        Ok((name.to_string(), email))
    }
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Token response after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn new(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Canonical form used for storage and lookup
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace; deliverability is not checked.
fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
