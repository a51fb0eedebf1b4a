// handlers/protected/tasks/web.rs - HTML task list and form submissions

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use tracing::info;

use crate::auth::{authorize_task, parse_task_id};
use crate::database::NewTask;
use crate::error::{messages, WebError};
use crate::handlers::form::{FormValues, TaskForm, TaskIdForm, UpdateTaskForm};
use crate::handlers::views::{render, AddTaskPage, IndexPage};
use crate::middleware::CurrentUser;
use crate::server::AppState;

/// GET / - the current user's tasks
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, WebError> {
    let tasks = state
        .db
        .tasks()
        .list_for_user(user.id)
        .await
        .map_err(|e| WebError::from(e).with_internal_message(messages::LIST_TASKS_ERROR))?;

    render(&IndexPage::new(&tasks))
}

/// GET /addTask
pub async fn add_task_page() -> Result<Html<String>, WebError> {
    render(&AddTaskPage::default())
}

/// POST /addTask - store errors re-render the form
pub async fn add_task_submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebError> {
    let new_task = NewTask {
        title: form.title,
        done: form.done,
        user_id: user.id,
    };

    match state.db.tasks().create(&new_task).await {
        Ok(task) => {
            info!(task_id = task.id, user_id = user.id, "task created");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::error!(user_id = user.id, "failed to insert task: {}", e);
            let page = render(&AddTaskPage {
                error: Some(messages::INSERT_TASK_ERROR),
            })?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
        }
    }
}

/// GET or POST /delete?id=N, the id may also come in a form body
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    FormValues(form): FormValues<TaskIdForm>,
) -> Result<Redirect, WebError> {
    let task_id = parse_task_id(&form.id)?;
    let tasks = state.db.tasks();

    authorize_task(&tasks, task_id, user.id).await?;
    tasks
        .delete(task_id)
        .await
        .map_err(|e| WebError::from(e).with_internal_message(messages::DELETE_TASK_ERROR))?;

    info!(task_id, user_id = user.id, "task deleted");
    Ok(Redirect::to("/"))
}

/// POST /update - called by the inline editor, answers an empty 200
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    FormValues(form): FormValues<UpdateTaskForm>,
) -> Result<StatusCode, WebError> {
    let task_id = parse_task_id(&form.id)?;
    let tasks = state.db.tasks();

    authorize_task(&tasks, task_id, user.id).await?;
    tasks
        .update(task_id, &form.title, form.done)
        .await
        .map_err(|e| WebError::from(e).with_internal_message(messages::UPDATE_TASK_ERROR))?;

    info!(task_id, user_id = user.id, "task updated");
    Ok(StatusCode::OK)
}
