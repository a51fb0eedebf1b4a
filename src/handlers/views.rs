use askama::Template;
use axum::response::Html;

use crate::database::Task;
use crate::error::WebError;

pub const INDEX_TITLE: &str = "Mi To-Do List";
pub const INDEX_GREETING: &str = "Bienvenido a tu lista de tareas";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub title: &'a str,
    pub greeting: &'a str,
    pub tasks: &'a [Task],
}

impl<'a> IndexPage<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self {
            title: INDEX_TITLE,
            greeting: INDEX_GREETING,
            tasks,
        }
    }
}

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template, Default)]
#[template(path = "register.html")]
pub struct RegisterPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template, Default)]
#[template(path = "add_task.html")]
pub struct AddTaskPage<'a> {
    pub error: Option<&'a str>,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, WebError> {
    Ok(Html(page.render()?))
}
