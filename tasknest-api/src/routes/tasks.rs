//! Task CRUD handlers, scoped to the signed-in user.
//!
//! The session auth middleware injects [`CurrentUser`]; every query is keyed
//! on the owner's id, so another user's task ids simply come back 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tower_sessions::Session;
use uuid::Uuid;

use tasknest_shared::flash::FlashMessage;
use tasknest_shared::models::task::{Task, TaskInput};
use tasknest_shared::store::TaskStore;

use crate::app::{AppState, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::session::take_flash;

/// Task list payload with any pending notices (sign-in lands here).
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub notices: Vec<FlashMessage>,
}

/// GET /tasks
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
) -> ApiResult<Json<TaskListResponse>> {
    let store = state.store();
    let tasks = store.list_for_user(user.id).await?;
    let notices = take_flash(&session).await?;

    Ok(Json(TaskListResponse { tasks, notices }))
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<TaskInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let store = state.store();
    let task = Task::create(&store, user.id, input).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let store = state.store();
    let task = store
        .find_for_user(id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// PUT /tasks/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let store = state.store();
    let task = store
        .find_for_user(id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let updated = task.apply(&store, input).await?;

    Ok(Json(updated))
}

/// DELETE /tasks/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let store = state.store();
    let deleted = store.delete_task(id, user.id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Task not found".to_string()))
    }
}
