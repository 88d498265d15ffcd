use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::io::audit_log::AuditLog;
use crate::io::config_io::DataPaths;
use crate::io::task_store::TaskStore;
use crate::model::config::FocusConfig;
use crate::ops::selector::Reveal;
use crate::ops::session::{SessionMachine, WorkerEvent};

/// Everything the widget owns: the task list, the session, the audit sink,
/// and the receiving end of the worker channel.
///
/// Lives on the UI thread and is handed by reference to the lifecycle
/// controller and the terminal front end.
pub struct AppState {
    pub store: TaskStore,
    pub session: SessionMachine,
    pub audit: AuditLog,
    events: Receiver<WorkerEvent>,
}

impl AppState {
    /// Build with a default session machine
    pub fn new(store: TaskStore, audit: AuditLog) -> Self {
        Self::with_machine(store, audit, SessionMachine::new)
    }

    /// Build, letting the caller configure the session machine around the
    /// worker channel's sender
    pub fn with_machine<F>(store: TaskStore, audit: AuditLog, build: F) -> Self
    where
        F: FnOnce(mpsc::Sender<WorkerEvent>) -> SessionMachine,
    {
        let (tx, rx) = mpsc::channel();
        AppState {
            store,
            session: build(tx),
            audit,
            events: rx,
        }
    }

    /// Open the task document and audit log named by `config`
    pub fn open(paths: &DataPaths, config: &FocusConfig) -> Self {
        let store = TaskStore::open(paths.tasks.clone());
        let audit = AuditLog::new(paths.log.clone());
        let reveal = Reveal::from(&config.reveal);
        let duration = config.session.duration_seconds();
        Self::with_machine(store, audit, |tx| {
            SessionMachine::new(tx)
                .with_reveal(reveal)
                .with_duration(duration)
        })
    }

    /// Drain every pending worker event without blocking
    pub fn poll_events(&self) -> Vec<WorkerEvent> {
        self.events.try_iter().collect()
    }

    /// Block up to `timeout` for the next worker event
    pub fn wait_event(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}
