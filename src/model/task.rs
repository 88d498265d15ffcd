use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when a task label is empty after trimming
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("task label must not be empty")]
pub struct InvalidTask;

/// A task: an opaque, non-empty text label.
///
/// Two tasks are equal when their labels are equal. Duplicates are allowed in
/// a task list, so equality only decides *which* entry a removal targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Task(String);

impl Task {
    /// Create a task from user input. Surrounding whitespace is trimmed.
    pub fn new(label: &str) -> Result<Self, InvalidTask> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(InvalidTask);
        }
        Ok(Task(trimmed.to_string()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Task::new(&label).map_err(serde::de::Error::custom)
    }
}
