//! Authentication Middleware
//!
//! Axum middleware binding each protected request to a stored identity.
//!
//! A request moves from "no token" to "token present" once a bearer token is
//! extracted, then to either authorized (identity resolved) or rejected.
//! Rejections answer 403 and the downstream handler never runs.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::models::AuthUser;
use crate::error::AuthError;
use crate::server::AppState;

/// Authentication middleware that validates bearer tokens and injects the user
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Reject the request unless it carries a valid token for an existing user
    pub async fn require_identity(
        State(state): State<AppState>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, AuthError> {
        let subject = {
            let Some(token) = bearer_token(req.headers()) else {
                tracing::warn!(method = %req.method(), uri = %req.uri(), "Missing bearer token");
                return Err(AuthError::InvalidToken);
            };
            state.jwt_service.verify(token).inspect_err(|_| {
                tracing::warn!(method = %req.method(), uri = %req.uri(), "Rejected invalid token");
            })?
        };

        let identity = match state.credentials.find_by_id(subject).await? {
            Some(identity) => identity,
            None => {
                tracing::warn!(%subject, "Token subject has no matching identity");
                return Err(AuthError::IdentityNotFound);
            }
        };

        tracing::debug!(user_id = %identity.id, "Request authenticated");
        req.extensions_mut().insert(AuthUser::from(identity));

        Ok(next.run(req).await)
    }
}

/// Token from an `Authorization: Bearer <token>` header, if well-formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Handlers behind [`AuthMiddleware::require_identity`] take `AuthUser` as
/// a plain argument.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
