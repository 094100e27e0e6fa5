//! In-process stores for tests and local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::database::models::{Task, TaskChanges, TaskStatus, UserIdentity};
use crate::database::store::{CredentialStore, TaskStore};
use crate::error::{AuthError, AuthResult};

/// Identities keyed by email. The map entry is the uniqueness guard, the
/// same role the `UNIQUE (email)` constraint plays in PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    by_email: DashMap<String, UserIdentity>,
    email_by_id: DashMap<Uuid, String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_identity(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> AuthResult<UserIdentity> {
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let identity = UserIdentity {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                self.email_by_id.insert(identity.id, identity.email.clone());
                slot.insert(identity.clone());
                Ok(identity)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserIdentity>> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<UserIdentity>> {
        let Some(email) = self.email_by_id.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_email.get(&email).map(|entry| entry.value().clone()))
    }
}

/// Tasks kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_for_owner(&self, owner: Uuid) -> AuthResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .iter()
            .filter(|task| task.user_id == owner)
            .cloned()
            .collect())
    }

    async fn create_task(&self, owner: Uuid, title: &str, status: TaskStatus) -> AuthResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> AuthResult<Option<Task>> {
        let mut tasks = self.tasks.write();
        let Some(task) = tasks
            .iter_mut()
            .find(|task| task.id == id && task.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> AuthResult<bool> {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|task| !(task.id == id && task.user_id == owner));
        Ok(tasks.len() != before)
    }
}
