use tracing::warn;

use super::AuthError;
use crate::database::{Task, TaskRepository};

/// Parse a task id from user input. Missing or non-numeric input is `InvalidId`.
pub fn parse_task_id(raw: &str) -> Result<i64, AuthError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidId(raw.to_string()))
}

/// Load a task for mutation on behalf of `user_id`.
///
/// A task owned by someone else, a task with no owner, and a task that does
/// not exist all produce `Forbidden`, so callers cannot tell which ids exist.
pub async fn authorize_task(
    tasks: &TaskRepository,
    task_id: i64,
    user_id: i64,
) -> Result<Task, AuthError> {
    match tasks.find(task_id).await? {
        Some(task) if task.is_owned_by(user_id) => Ok(task),
        Some(task) => {
            warn!(task_id, user_id, owner = ?task.user_id, "ownership check failed");
            Err(AuthError::Forbidden)
        }
        None => {
            warn!(task_id, user_id, "ownership check on missing task");
            Err(AuthError::Forbidden)
        }
    }
}
