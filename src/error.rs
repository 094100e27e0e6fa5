//! Error taxonomy for the authentication boundary and the task API.
//!
//! Every variant is recovered at the request boundary and mapped to a status
//! code plus a generic body. Internal details are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token subject has no matching identity")]
    IdentityNotFound,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("task not found")]
    TaskNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Signup reports duplicates and bad input the same way.
            AuthError::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Signup failed" }))).into_response()
            }
            AuthError::Validation(reason) => {
                tracing::debug!(%reason, "Rejected request body");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid request" }))).into_response()
            }
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })))
                    .into_response()
            }
            // Bare 403: a client cannot tell a forged token from a vanished account.
            AuthError::InvalidToken | AuthError::IdentityNotFound => {
                StatusCode::FORBIDDEN.into_response()
            }
            AuthError::TaskNotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Task not found" }))).into_response()
            }
            AuthError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_are_indistinguishable() {
        let forged = AuthError::InvalidToken.into_response();
        let orphaned = AuthError::IdentityNotFound.into_response();

        assert_eq!(forged.status(), StatusCode::FORBIDDEN);
        assert_eq!(orphaned.status(), StatusCode::FORBIDDEN);
        assert!(forged.headers().get(axum::http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn internal_errors_map_to_500() {
        let response = AuthError::Internal(anyhow::anyhow!("connection reset")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_email_maps_to_400() {
        let response = AuthError::DuplicateEmail.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
