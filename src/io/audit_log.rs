use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Kind of event written to the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    TaskAdded,
    TaskStarted,
    TaskCompleted,
    TaskNotCompleted,
    WidgetClosed,
    CloseCanceled,
}

impl AuditEvent {
    const ALL: [AuditEvent; 6] = [
        AuditEvent::TaskAdded,
        AuditEvent::TaskStarted,
        AuditEvent::TaskCompleted,
        AuditEvent::TaskNotCompleted,
        AuditEvent::WidgetClosed,
        AuditEvent::CloseCanceled,
    ];

    fn label(self) -> &'static str {
        match self {
            AuditEvent::TaskAdded => "Task added",
            AuditEvent::TaskStarted => "Task started",
            AuditEvent::TaskCompleted => "Task completed",
            AuditEvent::TaskNotCompleted => "Task not completed",
            AuditEvent::WidgetClosed => "Widget closed",
            AuditEvent::CloseCanceled => "Widget close canceled",
        }
    }

    /// Machine-readable name used in JSON output
    pub fn key(self) -> &'static str {
        match self {
            AuditEvent::TaskAdded => "task_added",
            AuditEvent::TaskStarted => "task_started",
            AuditEvent::TaskCompleted => "task_completed",
            AuditEvent::TaskNotCompleted => "task_not_completed",
            AuditEvent::WidgetClosed => "widget_closed",
            AuditEvent::CloseCanceled => "close_canceled",
        }
    }

    pub fn parse_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == s)
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
    pub detail: Option<String>,
}

impl AuditEntry {
    pub fn now(event: AuditEvent, detail: Option<&str>) -> Self {
        AuditEntry {
            timestamp: Utc::now(),
            event,
            detail: detail.map(|d| d.to_string()),
        }
    }

    /// Format as a single log line (no trailing newline).
    /// Line breaks inside the detail are flattened to spaces.
    pub fn to_line(&self) -> String {
        let ts = self
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        match &self.detail {
            Some(detail) => format!(
                "{} - {}: {}",
                ts,
                self.event,
                detail.replace(['\r', '\n'], " ")
            ),
            None => format!("{} - {}", ts, self.event),
        }
    }

    /// Parse a line written by `to_line`
    pub fn parse_line(line: &str) -> Option<Self> {
        let (ts, rest) = line.split_once(" - ")?;
        let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
        let (event, detail) = match rest.split_once(": ") {
            Some((event, detail)) => (AuditEvent::parse_label(event)?, Some(detail.to_string())),
            None => (AuditEvent::parse_label(rest)?, None),
        };
        Some(AuditEntry {
            timestamp,
            event,
            detail,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "event": self.event.key(),
            "detail": self.detail,
        })
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Append-only audit log sink. A disabled sink drops every entry.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        AuditLog { path: Some(path) }
    }

    pub fn disabled() -> Self {
        AuditLog { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one entry. Errors are swallowed and printed to stderr.
    pub fn record(&self, event: AuditEvent, detail: Option<&str>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_entry(path, &AuditEntry::now(event, detail)) {
            eprintln!("warning: could not write to audit log: {}", e);
        }
    }
}

fn append_entry(path: &Path, entry: &AuditEntry) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut line = entry.to_line();
    line.push('\n');
    file.write_all(line.as_bytes())
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read entries from the log, oldest first. Lines that don't parse are
/// skipped. With `limit`, only the most recent `limit` entries are returned.
pub fn read_entries(path: &Path, limit: Option<usize>) -> Vec<AuditEntry> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<AuditEntry> = content.lines().filter_map(AuditEntry::parse_line).collect();

    if let Some(n) = limit
        && entries.len() > n
    {
        entries.drain(..entries.len() - n);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry_at(event: AuditEvent, detail: Option<&str>) -> AuditEntry {
        AuditEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 5, 14, 9, 30, 0).unwrap(),
            event,
            detail: detail.map(String::from),
        }
    }

    #[test]
    fn test_line_format() {
        let entry = entry_at(AuditEvent::TaskAdded, Some("Write report"));
        assert_eq!(entry.to_line(), "2025-05-14T09:30:00Z - Task added: Write report");

        let entry = entry_at(AuditEvent::WidgetClosed, None);
        assert_eq!(entry.to_line(), "2025-05-14T09:30:00Z - Widget closed");
    }

    #[test]
    fn test_detail_newlines_flattened() {
        let entry = entry_at(AuditEvent::TaskStarted, Some("one\ntwo"));
        assert_eq!(entry.to_line(), "2025-05-14T09:30:00Z - Task started: one two");
    }

    #[test]
    fn test_parse_line() {
        let entry = entry_at(AuditEvent::TaskNotCompleted, Some("Fix: the bug"));
        let parsed = AuditEntry::parse_line(&entry.to_line()).unwrap();
        assert_eq!(parsed, entry);

        let entry = entry_at(AuditEvent::CloseCanceled, None);
        assert_eq!(AuditEntry::parse_line(&entry.to_line()).unwrap(), entry);
    }

    #[test]
    fn test_parse_line_invalid() {
        assert!(AuditEntry::parse_line("garbage").is_none());
        assert!(AuditEntry::parse_line("2025-05-14T09:30:00Z - Something else").is_none());
        assert!(AuditEntry::parse_line("yesterday - Task added: x").is_none());
    }

    #[test]
    fn test_record_and_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("task_log.txt");
        let log = AuditLog::new(path.clone());

        log.record(AuditEvent::TaskAdded, Some("a"));
        log.record(AuditEvent::TaskStarted, Some("a"));
        log.record(AuditEvent::WidgetClosed, None);

        let entries = read_entries(&path, None);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].event, AuditEvent::TaskAdded);
        assert_eq!(entries[2].event, AuditEvent::WidgetClosed);
        assert!(entries[2].detail.is_none());
    }

    #[test]
    fn test_read_with_limit_keeps_most_recent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("task_log.txt");
        let log = AuditLog::new(path.clone());
        for label in ["a", "b", "c"] {
            log.record(AuditEvent::TaskAdded, Some(label));
        }

        let entries = read_entries(&path, Some(2));
        let details: Vec<_> = entries.iter().filter_map(|e| e.detail.as_deref()).collect();
        assert_eq!(details, vec!["b", "c"]);
    }

    #[test]
    fn test_read_skips_foreign_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("task_log.txt");
        std::fs::write(
            &path,
            "not a log line\n2025-05-14T09:30:00Z - Task completed: x\n",
        )
        .unwrap();
        let entries = read_entries(&path, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, AuditEvent::TaskCompleted);
    }

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_entries(&tmp.path().join("missing.txt"), None).is_empty());
    }

    #[test]
    fn test_disabled_sink_writes_nothing() {
        let log = AuditLog::disabled();
        assert!(log.path().is_none());
        log.record(AuditEvent::TaskAdded, Some("a"));
    }

    #[test]
    fn test_entry_to_json() {
        let json = entry_at(AuditEvent::TaskCompleted, Some("x")).to_json();
        assert_eq!(json["event"], "task_completed");
        assert_eq!(json["detail"], "x");
        assert_eq!(json["timestamp"], "2025-05-14T09:30:00Z");
    }
}
