use crate::cli::OutputFormat;
use crate::database::Task;

/// Task listing in the requested format. Text output is one line per task and
/// empty when there are none; JSON is always a pretty-printed array.
pub fn render_tasks(output_format: OutputFormat, tasks: &[Task]) -> anyhow::Result<String> {
    match output_format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tasks)?),
        OutputFormat::Text => Ok(tasks
            .iter()
            .map(task_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn task_line(task: &Task) -> String {
    let status = if task.done { "Hecha" } else { "Pendiente" };
    format!("[{}] {} - {}", task.id, task.title, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task { id: 1, title: "Buy milk".into(), done: false, user_id: Some(1) },
            Task { id: 2, title: "Walk dog".into(), done: true, user_id: None },
        ]
    }

    #[test]
    fn text_lines() {
        let text = render_tasks(OutputFormat::Text, &tasks()).unwrap();
        assert_eq!(text, "[1] Buy milk - Pendiente\n[2] Walk dog - Hecha");
    }

    #[test]
    fn json_array() {
        let json = render_tasks(OutputFormat::Json, &tasks()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["title"], "Walk dog");
        assert_eq!(value[1]["done"], true);
        assert!(value[1]["user_id"].is_null());
    }

    #[test]
    fn empty_listing() {
        assert_eq!(render_tasks(OutputFormat::Text, &[]).unwrap(), "");
        assert_eq!(render_tasks(OutputFormat::Json, &[]).unwrap(), "[]");
    }
}
