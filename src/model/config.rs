use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from focus.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Length of a work session in minutes
    #[serde(default = "default_session_minutes")]
    pub minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            minutes: default_session_minutes(),
        }
    }
}

impl SessionConfig {
    pub fn duration_seconds(&self) -> u64 {
        self.minutes.saturating_mul(60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Number of candidates flashed before the committed pick
    #[serde(default = "default_reveal_steps")]
    pub steps: usize,
    /// Delay between two flashed candidates
    #[serde(default = "default_reveal_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            steps: default_reveal_steps(),
            interval_ms: default_reveal_interval_ms(),
        }
    }
}

impl RevealConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Task document, relative to the data directory
    #[serde(default = "default_tasks_file")]
    pub tasks: String,
    /// Audit log, relative to the data directory
    #[serde(default = "default_log_file")]
    pub log: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            tasks: default_tasks_file(),
            log: default_log_file(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides by theme slot name, as "#RRGGBB"
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

fn default_session_minutes() -> u64 {
    60
}

fn default_reveal_steps() -> usize {
    30
}

fn default_reveal_interval_ms() -> u64 {
    50
}

fn default_tasks_file() -> String {
    "tasks.json".to_string()
}

fn default_log_file() -> String {
    "task_log.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: FocusConfig = toml::from_str("").unwrap();
        assert_eq!(config, FocusConfig::default());
        assert_eq!(config.session.duration_seconds(), 3600);
        assert_eq!(config.reveal.steps, 30);
        assert_eq!(config.reveal.interval(), Duration::from_millis(50));
        assert_eq!(config.files.tasks, "tasks.json");
        assert_eq!(config.files.log, "task_log.txt");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: FocusConfig = toml::from_str(
            r##"
[session]
minutes = 25

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.session.minutes, 25);
        assert_eq!(config.reveal, RevealConfig::default());
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
    }
}
