//! Table bootstrap for a fresh database.
//!
//! The statements are idempotent so every startup may run them.

use anyhow::{Context, Result};
use deadpool_postgres::Pool;

/// Name of the unique index guarding `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS tasks (
    id         UUID PRIMARY KEY,
    user_id    UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    status     TEXT NOT NULL
               CONSTRAINT tasks_status_check CHECK (status IN ('To Do', 'In Progress', 'Done')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS tasks_user_id_idx ON tasks (user_id);
"#;

/// Create the `users` and `tasks` tables if they are missing
pub async fn apply(pool: &Pool) -> Result<()> {
    tracing::info!("Ensuring database schema");

    let client = pool
        .get()
        .await
        .context("Failed to get connection for schema setup")?;

    client
        .batch_execute(SCHEMA_SQL)
        .await
        .context("Failed to create database schema")?;

    tracing::info!("Database schema ready");
    Ok(())
}
