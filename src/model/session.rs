use std::fmt;

use serde::Serialize;

use super::task::Task;

/// Phase of the work session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// The reveal animation is running; no task is committed yet
    Selecting,
    /// A task is committed and the countdown is ticking
    Running,
    /// Waiting on the user to say whether the task was finished
    AwaitingCompletion,
}

impl Phase {
    /// Phases in which the session holds a task
    pub fn has_task(self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Selecting => write!(f, "selecting"),
            Phase::Running => write!(f, "running"),
            Phase::AwaitingCompletion => write!(f, "awaiting completion"),
        }
    }
}

/// Generation number of a session. Bumped on every StartWork so that events
/// from an earlier session's workers can be told apart.
pub type SessionId = u64;

/// The single work session of the process.
///
/// Fields are private: `current_task` is `Some` exactly when the phase is not
/// `Idle`, and the only way to move between phases is through the methods
/// below, which are driven by `ops::session::SessionMachine`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    phase: Phase,
    current_task: Option<Task>,
    remaining_seconds: u64,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current_task.as_ref()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Idle → Selecting, showing `candidate` until the reveal commits
    pub(crate) fn begin_selecting(&mut self, candidate: Task) -> SessionId {
        self.id += 1;
        self.phase = Phase::Selecting;
        self.current_task = Some(candidate);
        self.remaining_seconds = 0;
        self.id
    }

    /// Replace the candidate shown during Selecting
    pub(crate) fn show_candidate(&mut self, candidate: Task) {
        debug_assert_eq!(self.phase, Phase::Selecting);
        self.current_task = Some(candidate);
    }

    /// Selecting → Running with the committed task
    pub(crate) fn commit(&mut self, task: Task, duration_seconds: u64) {
        self.phase = Phase::Running;
        self.current_task = Some(task);
        self.remaining_seconds = duration_seconds;
    }

    pub(crate) fn set_remaining(&mut self, remaining: u64) {
        self.remaining_seconds = remaining;
    }

    /// Running → AwaitingCompletion
    pub(crate) fn await_completion(&mut self) {
        self.phase = Phase::AwaitingCompletion;
    }

    /// Back to Idle, handing back the task that was held
    pub(crate) fn finish(&mut self) -> Option<Task> {
        self.phase = Phase::Idle;
        self.remaining_seconds = 0;
        self.current_task.take()
    }

    /// Whether `current_task` agrees with the phase
    pub fn is_consistent(&self) -> bool {
        self.current_task.is_some() == self.phase.has_task()
    }
}
