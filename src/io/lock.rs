use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::io::task_store::parent_dir;

/// Lock file kept beside the task document. It is created on first use and
/// never removed: every process must lock the same inode.
pub const LOCK_FILE: &str = ".focus.lock";

/// How long a writer waits for another process before giving up
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("could not lock {path}: {source}")]
    Lock { path: PathBuf, source: io::Error },
    #[error("timed out waiting for {path}: another focus process is writing the task list")]
    Timeout { path: PathBuf },
}

/// Exclusive hold on a task document.
///
/// The widget and `focus add` take it around the whole read, change and
/// write of the document. The flock is released when the guard drops and
/// its file handle closes.
#[derive(Debug)]
pub struct DocumentLock {
    _handle: File,
}

impl DocumentLock {
    /// Lock file guarding `document`
    pub fn lock_path(document: &Path) -> PathBuf {
        parent_dir(document).join(LOCK_FILE)
    }

    pub fn acquire(document: &Path) -> Result<Self, LockError> {
        Self::acquire_within(document, DEFAULT_TIMEOUT)
    }

    /// Poll for the lock until `timeout` runs out
    pub fn acquire_within(document: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = Self::lock_path(document);
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_exclusive(&handle).map_err(|source| LockError::Lock {
            path: path.clone(),
            source,
        })? {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            thread::sleep(RETRY_INTERVAL);
        }
        Ok(DocumentLock { _handle: handle })
    }
}

/// `Ok(false)` while another handle holds the lock
#[cfg(unix)]
fn try_exclusive(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(code) if code == libc::EWOULDBLOCK || code == libc::EINTR => Ok(false),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn try_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}
