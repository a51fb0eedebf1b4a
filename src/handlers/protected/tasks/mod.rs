pub mod api; // /api/tasks, /api/tasks/:id
pub mod web; // /, /addTask, /delete, /update
