//! PostgreSQL-backed stores on top of the deadpool connection pool.

use anyhow::Context;
use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{FromRow, Task, TaskChanges, TaskStatus, UserIdentity};
use crate::database::schema::USERS_EMAIL_KEY;
use crate::database::store::{CredentialStore, TaskStore};
use crate::error::{AuthError, AuthResult};

const IDENTITY_COLUMNS: &str = "id, name, email, password_hash, created_at";
const TASK_COLUMNS: &str = "id, user_id, title, status, created_at, updated_at";

/// Credential store over the `users` table
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    db: DatabaseConnection,
}

impl PgCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// True when `err` is the unique-email constraint firing.
fn is_duplicate_email(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
        && err
            .as_db_error()
            .and_then(|db| db.constraint())
            .is_some_and(|name| name == USERS_EMAIL_KEY)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_identity(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> AuthResult<UserIdentity> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            IDENTITY_COLUMNS
        );

        match client.query_one(sql.as_str(), &[&id, &name, &email, &password_hash]).await {
            Ok(row) => Ok(UserIdentity::from_row(&row).context("Failed to decode user row")?),
            Err(e) if is_duplicate_email(&e) => Err(AuthError::DuplicateEmail),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert user").into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserIdentity>> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let sql = format!("SELECT {} FROM users WHERE email = $1", IDENTITY_COLUMNS);
        let row = client
            .query_opt(sql.as_str(), &[&email])
            .await
            .context("Failed to query user by email")?;

        Ok(row
            .map(|r| UserIdentity::from_row(&r))
            .transpose()
            .context("Failed to decode user row")?)
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<UserIdentity>> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", IDENTITY_COLUMNS);
        let row = client
            .query_opt(sql.as_str(), &[&id])
            .await
            .context("Failed to query user by id")?;

        Ok(row
            .map(|r| UserIdentity::from_row(&r))
            .transpose()
            .context("Failed to decode user row")?)
    }
}

/// Task store over the `tasks` table
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    db: DatabaseConnection,
}

impl PgTaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_for_owner(&self, owner: Uuid) -> AuthResult<Vec<Task>> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        );
        let rows = client
            .query(sql.as_str(), &[&owner])
            .await
            .context("Failed to list tasks")?;

        Ok(rows
            .iter()
            .map(Task::from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode task row")?)
    }

    async fn create_task(&self, owner: Uuid, title: &str, status: TaskStatus) -> AuthResult<Task> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, status) VALUES ($1, $2, $3, $4) RETURNING {}",
            TASK_COLUMNS
        );
        let row = client
            .query_one(sql.as_str(), &[&Uuid::new_v4(), &owner, &title, &status.as_str()])
            .await
            .context("Failed to insert task")?;

        Ok(Task::from_row(&row).context("Failed to decode task row")?)
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> AuthResult<Option<Task>> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let sql = format!(
            "UPDATE tasks SET title = COALESCE($3, title), status = COALESCE($4, status), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {}",
            TASK_COLUMNS
        );
        let status = changes.status.map(|s| s.as_str());
        let row = client
            .query_opt(sql.as_str(), &[&id, &owner, &changes.title, &status])
            .await
            .context("Failed to update task")?;

        Ok(row
            .map(|r| Task::from_row(&r))
            .transpose()
            .context("Failed to decode task row")?)
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> AuthResult<bool> {
        let client = self.db.pool().get().await.context("Failed to get DB connection")?;
        let deleted = client
            .execute("DELETE FROM tasks WHERE id = $1 AND user_id = $2", &[&id, &owner])
            .await
            .context("Failed to delete task")?;

        Ok(deleted > 0)
    }
}
