use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTask, Task, User};

// Older rows may carry NULL title/done
const TASK_COLUMNS: &str = "id, COALESCE(title, '') AS title, COALESCE(done, 0) AS done, user_id";

/// Credential store over the `users` table
#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user; a taken username surfaces as `DatabaseError::UniqueViolation`.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Which tasks a listing includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Done,
    Pending,
}

/// Column a listing is ordered by, always ascending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    #[default]
    Id,
    Title,
    Status,
}

/// Listing options used by the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub sort: TaskSort,
}

impl TaskQuery {
    fn to_sql(self) -> String {
        let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);

        match self.status {
            StatusFilter::All => {}
            StatusFilter::Done => sql.push_str(" WHERE done = 1"),
            StatusFilter::Pending => sql.push_str(" WHERE COALESCE(done, 0) = 0"),
        }

        sql.push_str(match self.sort {
            TaskSort::Id => " ORDER BY id ASC",
            TaskSort::Title => " ORDER BY title ASC, id ASC",
            TaskSort::Status => " ORDER BY done ASC, id ASC",
        });

        sql
    }
}

/// Task store over the `tasks` table. Every call is a single statement.
#[derive(Clone, Debug)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a task; the id comes from the table's AUTOINCREMENT key.
    pub async fn create(&self, task: &NewTask) -> Result<Task, DatabaseError> {
        let sql = format!(
            "INSERT INTO tasks (title, done, user_id) VALUES (?, ?, ?) RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(task.done)
            .bind(task.user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = ? ORDER BY id ASC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    /// All tasks regardless of owner
    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&query.to_sql())
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    pub async fn update(&self, id: i64, title: &str, done: bool) -> Result<Task, DatabaseError> {
        let sql = format!(
            "UPDATE tasks SET title = ?, done = ? WHERE id = ? RETURNING {}",
            TASK_COLUMNS
        );
        match sqlx::query_as::<_, Task>(&sql)
            .bind(title)
            .bind(done)
            .bind(id)
            .fetch_one(&self.pool)
            .await
        {
            Ok(task) => Ok(task),
            Err(sqlx::Error::RowNotFound) => Err(DatabaseError::NotFound(format!("task {}", id))),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("task {}", id)));
        }

        Ok(())
    }
}
