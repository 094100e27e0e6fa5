//! Task CRUD routes. Every handler acts on the caller's own tasks only.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::models::{AuthUser, MessageResponse};
use crate::database::models::{Task, TaskChanges, TaskStatus};
use crate::error::{AuthError, AuthResult};
use crate::server::AppState;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

fn validate_title(raw: &str) -> AuthResult<String> {
    let title = raw.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(AuthError::Validation("title".into()));
    }
    Ok(title.to_string())
}

/// `GET /tasks`
pub async fn list_tasks(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> AuthResult<Json<Vec<Task>>> {
    let tasks = app_state.tasks.list_for_owner(user.id).await?;
    Ok(Json(tasks))
}

/// `POST /tasks`
pub async fn create_task(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<Task>)> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;
    let title = validate_title(&payload.title)?;

    let task = app_state
        .tasks
        .create_task(user.id, &title, payload.status)
        .await?;
    tracing::info!(event = "task.created", user_id = %user.id, task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`
pub async fn update_task(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> AuthResult<Json<Task>> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;
    let changes = TaskChanges {
        title: payload.title.as_deref().map(validate_title).transpose()?,
        status: payload.status,
    };

    let task = app_state
        .tasks
        .update_task(user.id, id, changes)
        .await?
        .ok_or(AuthError::TaskNotFound)?;

    Ok(Json(task))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AuthResult<Json<MessageResponse>> {
    if !app_state.tasks.delete_task(user.id, id).await? {
        return Err(AuthError::TaskNotFound);
    }
    tracing::info!(event = "task.deleted", user_id = %user.id, task_id = %id, "Task deleted");

    Ok(Json(MessageResponse::new("Task deleted")))
}

pub fn create_task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_trimmed_and_bounded() {
        assert_eq!(validate_title("  ship it ").unwrap(), "ship it");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn create_defaults_to_todo() {
        let request: CreateTaskRequest = serde_json::from_str(r#"{"title":"a"}"#).unwrap();
        assert_eq!(request.status, TaskStatus::ToDo);
    }
}
