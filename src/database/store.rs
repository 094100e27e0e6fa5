//! Storage seams injected into the application state.
//!
//! Handlers only ever see these traits; the PostgreSQL and in-memory
//! backends are interchangeable behind them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Task, TaskChanges, TaskStatus, UserIdentity};
use crate::error::AuthResult;

/// Owner of user identity records.
///
/// Emails are expected in normalized form (see
/// [`normalize_email`](crate::auth::models::normalize_email)).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new identity.
    ///
    /// Fails with [`AuthError::DuplicateEmail`](crate::error::AuthError::DuplicateEmail)
    /// when the email is taken; an existing record is never overwritten.
    async fn create_identity(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> AuthResult<UserIdentity>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserIdentity>>;

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<UserIdentity>>;
}

/// Task persistence. Every operation is scoped to the owning user, so a
/// task id belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_for_owner(&self, owner: Uuid) -> AuthResult<Vec<Task>>;

    async fn create_task(&self, owner: Uuid, title: &str, status: TaskStatus) -> AuthResult<Task>;

    /// Returns `None` when no task with `id` belongs to `owner`.
    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> AuthResult<Option<Task>>;

    /// Returns `false` when no task with `id` belongs to `owner`.
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> AuthResult<bool>;
}
