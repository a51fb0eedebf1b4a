//! Authentication and task-ownership authorization.
//!
//! Everything here is independent of the HTTP surface: the web and JSON
//! handlers both call into these functions and only differ in how they
//! render an [`AuthError`].

pub mod credentials;
pub mod ownership;
pub mod password;

use thiserror::Error;

use crate::database::DatabaseError;

pub use credentials::{login, register};
pub use ownership::{authorize_task, parse_task_id};
pub use password::Argon2Hasher;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    DuplicateUsername,

    /// Unknown username and wrong password are deliberately the same error
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("task is not owned by the current user")]
    Forbidden,

    #[error("invalid task id: {0:?}")]
    InvalidId(String),

    #[error("password hashing failed")]
    PasswordHash,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}
