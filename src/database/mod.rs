pub mod manager;
pub mod models;
pub mod repository;
pub mod schema;

pub use manager::{Database, DatabaseError};
pub use models::{NewTask, Task, User};
pub use repository::{StatusFilter, TaskQuery, TaskRepository, TaskSort, UserRepository};
