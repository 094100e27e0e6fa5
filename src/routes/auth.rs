//! Auth routes for signup, login, and the current user

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};

use crate::auth::models::{
    AuthUser, LoginRequest, MessageResponse, SignupRequest, TokenResponse, normalize_email,
};
use crate::error::{AuthError, AuthResult};
use crate::server::AppState;

/// `POST /signup`: create an identity, 201 on success
pub async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;
    let (name, email) = payload.validate()?;

    let hasher = app_state.password_service.clone();
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("Password hashing task failed")??;

    match app_state
        .credentials
        .create_identity(&name, &email, &password_hash)
        .await
    {
        Ok(identity) => {
            tracing::info!(event = "user.registered", user_id = %identity.id, "New user registered");
            Ok((StatusCode::CREATED, Json(MessageResponse::new("User created"))))
        }
        Err(AuthError::DuplicateEmail) => {
            tracing::info!(event = "user.duplicate", "Signup rejected for an existing email");
            Err(AuthError::DuplicateEmail)
        }
        Err(e) => Err(e),
    }
}

/// `POST /login`: exchange credentials for a bearer token
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<TokenResponse>> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;
    let email = normalize_email(&payload.email);

    let candidate = app_state.credentials.find_by_email(&email).await?;

    // Unknown emails still pay for one hash so timing matches a wrong password.
    let hasher = app_state.password_service.clone();
    let password = payload.password;
    let authenticated = tokio::task::spawn_blocking(move || match candidate {
        Some(identity) if hasher.verify(&password, &identity.password_hash) => Some(identity),
        Some(_) => None,
        None => {
            hasher.verify_against_dummy(&password);
            None
        }
    })
    .await
    .context("Password verification task failed")?;

    let Some(identity) = authenticated else {
        tracing::warn!(event = "auth.failed", "Login rejected");
        return Err(AuthError::InvalidCredentials);
    };

    let issued = app_state.jwt_service.issue(identity.id)?;
    tracing::info!(event = "auth.success", user_id = %identity.id, "User authenticated");

    Ok(Json(TokenResponse::new(issued.token, issued.expires_in)))
}

/// `GET /me`: the identity bound to the presented token
pub async fn me(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Routes that sit behind the identity middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
