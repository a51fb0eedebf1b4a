use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
    /// Owning user; rows written by older deployments may have none
    pub user_id: Option<i64>,
}

impl Task {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Values for a task that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub done: bool,
    pub user_id: i64,
}
