use serde::Serialize;

use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskListJson {
    pub file: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub added: Task,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Numbered listing, one task per line
pub fn format_task_listing(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["no tasks".to_string()];
    }
    let width = tasks.len().to_string().len();
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{:>width$}. {}", i + 1, t, width = width))
        .collect()
}
