//! Table definitions, applied idempotently at startup.

use sqlx::{Executor, SqlitePool};
use tracing::debug;

use super::DatabaseError;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "create_users_table",
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )",
    ),
    (
        "create_tasks_table",
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            done BOOLEAN,
            user_id INTEGER REFERENCES users(id) ON DELETE CASCADE
        )",
    ),
    (
        "create_tasks_user_id_index",
        "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
    ),
];

pub async fn ensure(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for (name, sql) in STATEMENTS {
        debug!("Applying schema statement: {}", name);
        pool.execute(*sql).await?;
    }
    Ok(())
}
