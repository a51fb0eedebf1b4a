// handlers/protected/tasks/api.rs - JSON task CRUD
//
// The id always comes from the path. A non-numeric id is a 400, an id the
// caller does not own (or that does not exist) is a 403.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;
use tracing::info;

use crate::auth::{authorize_task, parse_task_id};
use crate::database::{NewTask, Task};
use crate::error::{messages, ApiError};
use crate::handlers::form::{Input, TaskForm};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, Message};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskMessage {
    pub message: &'static str,
    pub task: Task,
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<TaskList> {
    let tasks = state
        .db
        .tasks()
        .list_for_user(user.id)
        .await
        .map_err(|e| ApiError::from(e).with_internal_message(messages::LIST_TASKS_ERROR))?;

    Ok(ApiResponse::success(TaskList { tasks }))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Input(form): Input<TaskForm>,
) -> ApiResult<TaskMessage> {
    let new_task = NewTask {
        title: form.title,
        done: form.done,
        user_id: user.id,
    };

    let task = state
        .db
        .tasks()
        .create(&new_task)
        .await
        .map_err(|e| ApiError::from(e).with_internal_message(messages::INSERT_TASK_ERROR))?;

    info!(task_id = task.id, user_id = user.id, "task created");
    Ok(ApiResponse::created(TaskMessage {
        message: messages::TASK_CREATED,
        task,
    }))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(raw_id): Path<String>,
    Input(form): Input<TaskForm>,
) -> ApiResult<TaskMessage> {
    let task_id = parse_task_id(&raw_id)?;
    let tasks = state.db.tasks();

    authorize_task(&tasks, task_id, user.id).await?;
    let task = tasks
        .update(task_id, &form.title, form.done)
        .await
        .map_err(|e| ApiError::from(e).with_internal_message(messages::UPDATE_TASK_ERROR))?;

    info!(task_id, user_id = user.id, "task updated");
    Ok(ApiResponse::success(TaskMessage {
        message: messages::TASK_UPDATED,
        task,
    }))
}

/// DELETE (or POST) /api/tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(raw_id): Path<String>,
) -> ApiResult<Message> {
    let task_id = parse_task_id(&raw_id)?;
    let tasks = state.db.tasks();

    authorize_task(&tasks, task_id, user.id).await?;
    tasks
        .delete(task_id)
        .await
        .map_err(|e| ApiError::from(e).with_internal_message(messages::DELETE_TASK_ERROR))?;

    info!(task_id, user_id = user.id, "task deleted");
    Ok(ApiResponse::success(Message::new(messages::TASK_DELETED)))
}
