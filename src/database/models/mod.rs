pub mod task;
pub mod user;

pub use task::{NewTask, Task};
pub use user::User;
