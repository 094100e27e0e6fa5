//! # Server Module
//!
//! HTTP server setup and route configuration.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{AuthMiddleware, JwtService, PasswordService};
use crate::config::{Config, ServerConfig};
use crate::database::{
    CredentialStore, DatabaseConnection, PgCredentialStore, PgTaskStore, TaskStore,
};
use crate::routes::{auth, health::ping, tasks};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub password_service: Arc<PasswordService>,
    pub credentials: Arc<dyn CredentialStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        jwt_service: JwtService,
        password_service: PasswordService,
        credentials: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            jwt_service: Arc::new(jwt_service),
            password_service: Arc::new(password_service),
            credentials,
            tasks,
        }
    }
}

/// Assemble the full router: public and protected routes plus the
/// transport layers (tracing, timeout, CORS).
pub fn build_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(tasks::create_task_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            AuthMiddleware::require_identity,
        ));

    let origins = server
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    let api = Router::new()
        .route("/ping", get(ping))
        .merge(auth::public_routes())
        .merge(protected_routes);

    let app = if server.base_path.is_empty() {
        api
    } else {
        Router::new().nest(&server.base_path, api)
    };

    let app = app
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
                .layer(cors),
        )
        .with_state(app_state);

    Ok(app)
}

/// Connect to the database, serve until a shutdown signal, then close the pool.
pub async fn start(config: Config) -> Result<()> {
    let password_service = PasswordService::new(config.password_hash)?;
    let jwt_service = JwtService::new(
        &config.auth.jwt_secret,
        chrono::Duration::seconds(config.auth.token_ttl_secs),
    );

    let db = DatabaseConnection::new(config.database.clone()).await?;
    db.ensure_schema().await?;

    let app_state = AppState::new(
        jwt_service,
        password_service,
        Arc::new(PgCredentialStore::new(db.clone())),
        Arc::new(PgTaskStore::new(db.clone())),
    );
    let app = build_router(app_state, &config.server)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Health check available at http://{}{}/ping",
        addr,
        config.server.base_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
