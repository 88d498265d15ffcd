use std::fmt;

use crate::io::audit_log::AuditEvent;
use crate::io::task_store::PersistenceError;
use crate::model::session::Phase;
use crate::model::task::{InvalidTask, Task};
use crate::ops::app_state::AppState;
use crate::ops::session::{Applied, SessionError, WorkerEvent};

/// Whether the widget is on screen or parked in the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Minimized,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("the widget is not minimized")]
    NotMinimized,
}

/// Why the completion question is being asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    TimerExpired,
    Closing,
}

/// A yes/no question the front end must answer before anything else happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt<'a> {
    Completion {
        task: &'a Task,
        reason: CompletionReason,
    },
    Exit,
}

impl Prompt<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::Completion { .. } => "Task Completion",
            Prompt::Exit => "Exit",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Prompt::Completion {
                task,
                reason: CompletionReason::TimerExpired,
            } => format!("Time's up. Did you complete the task: '{}'?", task),
            Prompt::Completion {
                task,
                reason: CompletionReason::Closing,
            } => format!("You have an active task: '{}'. Did you complete it?", task),
            Prompt::Exit => "Are all tasks completed, or do you want to exit?".to_string(),
        }
    }
}

/// Synchronous yes/no prompt. `confirm` must not return until the user
/// has answered.
pub trait Prompter {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool;
}

/// A user-visible message produced by a controller action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Warning(s) | Notice::Error(s) => s,
        }
    }

    fn save_failed(e: &PersistenceError) -> Self {
        Notice::Warning(format!("not saved: {}", e))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<&SessionError> for Notice {
    fn from(e: &SessionError) -> Self {
        Notice::Error(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The user confirmed; the front end should terminate
    Exit,
    /// The user backed out; the widget keeps running
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReport {
    pub outcome: CloseOutcome,
    pub notices: Vec<Notice>,
}

/// Routes user intents and worker events to the session and task store,
/// and owns the widget's visibility.
///
/// Closing never drops an active session: a Running or AwaitingCompletion
/// session is resolved through a completion prompt first.
#[derive(Debug, Default)]
pub struct Lifecycle {
    visibility: Visibility,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Park the widget in the tray. Allowed in any phase.
    pub fn minimize(&mut self) {
        self.visibility = Visibility::Minimized;
    }

    /// Bring the widget back from the tray
    pub fn restore(&mut self) -> Result<(), LifecycleError> {
        if self.visibility != Visibility::Minimized {
            return Err(LifecycleError::NotMinimized);
        }
        self.visibility = Visibility::Visible;
        Ok(())
    }

    /// Start a randomized session. An empty list leaves the session Idle.
    pub fn start_work(&self, app: &mut AppState) -> Result<(), SessionError> {
        app.session.start_work(app.store.tasks())?;
        Ok(())
    }

    /// Append a task from user input and persist it. A failed write is
    /// reported as a warning; the task stays in the list either way.
    pub fn add_task(&self, app: &mut AppState, label: &str) -> Result<Vec<Notice>, InvalidTask> {
        let task = Task::new(label)?;
        let mut notices = Vec::new();
        if let Err(e) = app.store.add(task.clone()) {
            notices.push(Notice::save_failed(&e));
        }
        app.audit.record(AuditEvent::TaskAdded, Some(task.label()));
        notices.insert(0, Notice::Info(format!("New task '{}' has been added!", task)));
        Ok(notices)
    }

    /// Apply one worker event, prompting for completion when the timer ran out.
    pub fn dispatch(
        &mut self,
        app: &mut AppState,
        event: WorkerEvent,
        prompter: &mut dyn Prompter,
    ) -> Vec<Notice> {
        match app.session.apply(event) {
            Ok(Applied::Started(task)) => {
                app.audit.record(AuditEvent::TaskStarted, Some(task.label()));
                Vec::new()
            }
            Ok(Applied::NeedsCompletion) => {
                resolve_completion(app, prompter, CompletionReason::TimerExpired)
            }
            Ok(Applied::Stale | Applied::Updated) => Vec::new(),
            Err(e) => vec![Notice::from(&e)],
        }
    }

    /// Close the widget.
    ///
    /// An active session is settled with a completion prompt first, then
    /// the user confirms the exit. Declining the exit keeps the widget open
    /// in its current visibility with the session back at Idle.
    pub fn close(&mut self, app: &mut AppState, prompter: &mut dyn Prompter) -> CloseReport {
        let mut notices = Vec::new();

        if matches!(app.session.phase(), Phase::Running | Phase::AwaitingCompletion) {
            let interrupted = app.session.interrupt().map(|_| ());
            match interrupted {
                Ok(()) => notices.extend(resolve_completion(app, prompter, CompletionReason::Closing)),
                Err(e) => notices.push(Notice::from(&e)),
            }
        }

        let outcome = if prompter.confirm(&Prompt::Exit) {
            app.audit.record(AuditEvent::WidgetClosed, None);
            CloseOutcome::Exit
        } else {
            app.audit.record(AuditEvent::CloseCanceled, None);
            CloseOutcome::Canceled
        };

        CloseReport { outcome, notices }
    }
}

/// Ask whether the held task was finished and apply the answer
fn resolve_completion(
    app: &mut AppState,
    prompter: &mut dyn Prompter,
    reason: CompletionReason,
) -> Vec<Notice> {
    let Some(task) = app.session.current_task().cloned() else {
        return Vec::new();
    };
    let completed = prompter.confirm(&Prompt::Completion {
        task: &task,
        reason,
    });

    let outcome = match app.session.completion_answered(completed, &mut app.store) {
        Ok(outcome) => outcome,
        Err(e) => return vec![Notice::from(&e)],
    };

    let mut notices = Vec::new();
    if outcome.completed {
        app.audit
            .record(AuditEvent::TaskCompleted, Some(outcome.task.label()));
        notices.push(Notice::Info(format!(
            "The task '{}' has been removed from the list!",
            outcome.task
        )));
    } else {
        app.audit
            .record(AuditEvent::TaskNotCompleted, Some(outcome.task.label()));
        notices.push(Notice::Info(format!(
            "The task '{}' remains in the list.",
            outcome.task
        )));
    }
    if let Some(e) = &outcome.save_error {
        notices.push(Notice::save_failed(e));
    }
    notices
}
