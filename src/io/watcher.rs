use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::task_store::parent_dir;

/// Events sent from the file watcher to the widget's event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The task document was created, rewritten, or removed on disk.
    TasksChanged,
}

/// Watches the directory holding the task document.
pub struct TaskFileWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl TaskFileWatcher {
    /// Start watching `tasks_path`. Call `poll()` once per frame.
    pub fn start(tasks_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let file_name = tasks_path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                if is_tasks_change(&event, file_name.as_ref()) {
                    let _ = tx.send(FileEvent::TasksChanged);
                }
            },
            Config::default(),
        )?;

        // Atomic saves rename a temp file over the document, so watch the
        // directory rather than the file itself.
        watcher.watch(parent_dir(tasks_path), RecursiveMode::NonRecursive)?;
        Ok(TaskFileWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Collapses a burst of events into one.
    pub fn poll(&self) -> Option<FileEvent> {
        let mut changed = None;
        while let Ok(evt) = self.rx.try_recv() {
            changed = Some(evt);
        }
        changed
    }
}

fn is_tasks_change(event: &Event, file_name: Option<&OsString>) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }
    let Some(file_name) = file_name else {
        return false;
    };
    event
        .paths
        .iter()
        .any(|p: &PathBuf| p.file_name() == Some(file_name.as_os_str()))
}
