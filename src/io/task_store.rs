use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::io::lock::{DocumentLock, LockError};
use crate::model::task::Task;

/// Error type for task document I/O
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid task list: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize task list: {0}")]
    SerializeError(serde_json::Error),
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error(transparent)]
    LockError(#[from] LockError),
}

/// Directory holding `path`, treating a bare file name as the current directory
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// A task document as read from disk
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    pub tasks: Vec<Task>,
    /// Whitespace-only entries that were dropped while loading
    pub blank_entries: usize,
}

/// Read the task document. A missing file is an empty list. Blank entries
/// are skipped one by one; only a document that isn't a list of strings is
/// rejected.
pub fn load_tasks(path: &Path) -> Result<TaskDocument, PersistenceError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TaskDocument::default()),
        Err(e) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let labels: Vec<String> =
        serde_json::from_str(&content).map_err(|e| PersistenceError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut doc = TaskDocument::default();
    for label in labels {
        match Task::new(&label) {
            Ok(task) => doc.tasks.push(task),
            Err(_) => doc.blank_entries += 1,
        }
    }
    Ok(doc)
}

/// Serialize tasks as a JSON array of strings, indented by four spaces.
pub fn serialize_tasks(tasks: &[Task]) -> Result<Vec<u8>, PersistenceError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tasks
        .serialize(&mut ser)
        .map_err(PersistenceError::SerializeError)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write the document. The caller must hold its `DocumentLock`.
fn write_tasks(path: &Path, tasks: &[Task]) -> Result<(), PersistenceError> {
    let content = serialize_tasks(tasks)?;
    atomic_write(path, &content).map_err(|e| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Overwrite the task document under its lock.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), PersistenceError> {
    let _lock = DocumentLock::acquire(path)?;
    write_tasks(path, tasks)
}

/// Path a malformed document is copied to before it can be overwritten
pub fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// The task list, in memory and on disk.
///
/// `add` and `remove` hold the document lock while they re-read the file,
/// apply the change to what is on disk and write it back, so a task added by
/// another process in the meantime survives. Memory then mirrors the file.
/// A failed lock or write still leaves the change applied in memory and
/// hands the error back, so the caller can warn without losing the user's
/// action.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    load_error: Option<PersistenceError>,
    blank_entries: usize,
}

impl TaskStore {
    /// Load the document at `path`. Never fails: an unreadable or malformed
    /// document yields an empty list and the error is kept for `load_error`.
    pub fn open(path: PathBuf) -> Self {
        let (doc, load_error) = match load_tasks(&path) {
            Ok(doc) => (doc, None),
            Err(e) => {
                if matches!(e, PersistenceError::ParseError { .. }) {
                    preserve_corrupt(&path);
                }
                (TaskDocument::default(), Some(e))
            }
        };
        TaskStore {
            path,
            tasks: doc.tasks,
            load_error,
            blank_entries: doc.blank_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The error hit while loading, if the list was substituted with an empty one
    pub fn load_error(&self) -> Option<&PersistenceError> {
        self.load_error.as_ref()
    }

    pub fn take_load_error(&mut self) -> Option<PersistenceError> {
        self.load_error.take()
    }

    /// Blank entries skipped by the initial load
    pub fn blank_entries(&self) -> usize {
        self.blank_entries
    }

    /// Load warning for skipped blank entries, if there were any
    pub fn blank_entries_warning(&self) -> Option<String> {
        match self.blank_entries {
            0 => None,
            1 => Some(format!("skipped 1 blank entry in {}", self.path.display())),
            n => Some(format!("skipped {} blank entries in {}", n, self.path.display())),
        }
    }

    /// Write the current list to disk
    pub fn save(&self) -> Result<(), PersistenceError> {
        save_tasks(&self.path, &self.tasks)
    }

    /// Append a task and persist
    pub fn add(&mut self, task: Task) -> Result<(), PersistenceError> {
        self.update(|tasks| {
            tasks.push(task);
            true
        })?;
        Ok(())
    }

    /// Remove the first task equal to `task` and persist.
    /// Returns `Ok(false)` without writing if the document has no match.
    pub fn remove(&mut self, task: &Task) -> Result<bool, PersistenceError> {
        self.update(|tasks| match tasks.iter().position(|t| t == task) {
            Some(index) => {
                tasks.remove(index);
                true
            }
            None => false,
        })
    }

    /// Re-read the document after an external change.
    /// Returns whether the in-memory list changed. On error the list is kept.
    pub fn reload(&mut self) -> Result<bool, PersistenceError> {
        let doc = load_tasks(&self.path)?;
        if doc.tasks == self.tasks {
            return Ok(false);
        }
        self.tasks = doc.tasks;
        Ok(true)
    }

    /// Lock the document, apply `change` to its current contents and write
    /// it back if `change` reports a modification.
    fn update<F>(&mut self, change: F) -> Result<bool, PersistenceError>
    where
        F: FnOnce(&mut Vec<Task>) -> bool,
    {
        let _lock = match DocumentLock::acquire(&self.path) {
            Ok(lock) => lock,
            Err(e) => {
                change(&mut self.tasks);
                return Err(e.into());
            }
        };

        let mut tasks = self.on_disk();
        let changed = change(&mut tasks);
        self.tasks = tasks;
        if changed {
            write_tasks(&self.path, &self.tasks)?;
        }
        Ok(changed)
    }

    /// The document as it is now. If it can't be read, the in-memory list
    /// stands in; a malformed file is copied aside before it is replaced.
    fn on_disk(&self) -> Vec<Task> {
        match load_tasks(&self.path) {
            Ok(doc) => doc.tasks,
            Err(e) => {
                if matches!(e, PersistenceError::ParseError { .. }) {
                    preserve_corrupt(&self.path);
                }
                self.tasks.clone()
            }
        }
    }
}

fn preserve_corrupt(path: &Path) {
    let backup = corrupt_backup_path(path);
    let result = fs::read(path).and_then(|bytes| atomic_write(&backup, &bytes));
    if let Err(e) = result {
        eprintln!(
            "warning: could not preserve malformed task list at {}: {}",
            backup.display(),
            e
        );
    }
}
