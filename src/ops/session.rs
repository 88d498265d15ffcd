use std::fmt;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::io::task_store::{PersistenceError, TaskStore};
use crate::model::session::{Phase, Session, SessionId};
use crate::model::task::Task;
use crate::ops::countdown::{self, CancelHandle};
use crate::ops::selector::{self, EmptyTaskListError, Reveal};

/// Default session length: one hour
pub const SESSION_SECONDS: u64 = 3600;

/// Messages from the reveal and countdown workers to the UI thread.
/// Each carries the session generation that spawned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    RevealTick { session: SessionId, candidate: Task },
    SelectionCommitted { session: SessionId, task: Task },
    CountdownTick { session: SessionId, remaining: u64 },
    TimerExpired { session: SessionId },
}

impl WorkerEvent {
    pub fn session(&self) -> SessionId {
        match self {
            WorkerEvent::RevealTick { session, .. }
            | WorkerEvent::SelectionCommitted { session, .. }
            | WorkerEvent::CountdownTick { session, .. }
            | WorkerEvent::TimerExpired { session } => *session,
        }
    }
}

/// Session transitions, named for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartWork,
    SelectionCommitted,
    TimerExpired,
    CompletionAnswered,
    CloseRequested,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::StartWork => write!(f, "start work"),
            Transition::SelectionCommitted => write!(f, "commit a selection"),
            Transition::TimerExpired => write!(f, "expire the timer"),
            Transition::CompletionAnswered => write!(f, "answer completion"),
            Transition::CloseRequested => write!(f, "interrupt the session"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    EmptyTaskList(#[from] EmptyTaskListError),
    #[error("cannot {transition} while {phase}")]
    InvalidTransition { phase: Phase, transition: Transition },
}

/// What applying a worker event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The event belonged to an earlier session and was dropped
    Stale,
    /// Display state changed (candidate or clock)
    Updated,
    /// The reveal committed to this task and the countdown started
    Started(Task),
    /// The countdown ran out; a completion answer is now required
    NeedsCompletion,
}

/// Result of answering the completion prompt
#[derive(Debug)]
pub struct CompletionOutcome {
    pub task: Task,
    pub completed: bool,
    /// Whether the task was found in (and removed from) the list
    pub removed: bool,
    /// Set when the removal could not be persisted
    pub save_error: Option<PersistenceError>,
}

/// Owns the session and drives it through its phases.
///
/// Workers report back through `events`; the UI thread feeds what it
/// receives into `apply`. Nothing here blocks.
pub struct SessionMachine {
    session: Session,
    countdown: Option<CancelHandle>,
    events: Sender<WorkerEvent>,
    reveal: Reveal,
    duration_seconds: u64,
    tick_interval: Duration,
}

impl SessionMachine {
    pub fn new(events: Sender<WorkerEvent>) -> Self {
        SessionMachine {
            session: Session::default(),
            countdown: None,
            events,
            reveal: Reveal::default(),
            duration_seconds: SESSION_SECONDS,
            tick_interval: countdown::TICK,
        }
    }

    pub fn with_reveal(mut self, reveal: Reveal) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn with_duration(mut self, duration_seconds: u64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.session.current_task()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Whether a countdown worker is live (started and not cancelled)
    pub fn countdown_active(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(|h| !h.is_cancelled() && !h.is_finished())
    }

    fn invalid(&self, transition: Transition) -> SessionError {
        SessionError::InvalidTransition {
            phase: self.phase(),
            transition,
        }
    }

    /// StartWork: Idle → Selecting, and kick off the reveal.
    pub fn start_work(&mut self, tasks: &[Task]) -> Result<SessionId, SessionError> {
        if self.phase() != Phase::Idle {
            return Err(self.invalid(Transition::StartWork));
        }
        let candidate = selector::pick(tasks).ok_or(EmptyTaskListError)?;
        let session = self.session.begin_selecting(candidate);

        let tick_tx = self.events.clone();
        let done_tx = self.events.clone();
        let started = self.reveal.run(
            tasks,
            move |candidate| {
                let _ = tick_tx.send(WorkerEvent::RevealTick { session, candidate });
            },
            move |task| {
                let _ = done_tx.send(WorkerEvent::SelectionCommitted { session, task });
            },
        );
        if let Err(e) = started {
            self.session.finish();
            return Err(e.into());
        }
        Ok(session)
    }

    /// Feed one worker event into the machine.
    pub fn apply(&mut self, event: WorkerEvent) -> Result<Applied, SessionError> {
        if event.session() != self.session.id() {
            return Ok(Applied::Stale);
        }
        match event {
            WorkerEvent::RevealTick { candidate, .. } => {
                if self.phase() != Phase::Selecting {
                    return Ok(Applied::Stale);
                }
                self.session.show_candidate(candidate);
                Ok(Applied::Updated)
            }
            WorkerEvent::SelectionCommitted { task, .. } => {
                self.selection_committed(task.clone())?;
                Ok(Applied::Started(task))
            }
            WorkerEvent::CountdownTick { remaining, .. } => {
                if self.phase() != Phase::Running {
                    return Ok(Applied::Stale);
                }
                self.session.set_remaining(remaining);
                Ok(Applied::Updated)
            }
            WorkerEvent::TimerExpired { .. } => {
                if self.phase() != Phase::Running {
                    // Cancelled by a close that got there first
                    return Ok(Applied::Stale);
                }
                self.timer_expired()?;
                Ok(Applied::NeedsCompletion)
            }
        }
    }

    /// SelectionCommitted: Selecting → Running, start the countdown.
    fn selection_committed(&mut self, task: Task) -> Result<(), SessionError> {
        if self.phase() != Phase::Selecting {
            return Err(self.invalid(Transition::SelectionCommitted));
        }
        self.session.commit(task, self.duration_seconds);
        self.stop_countdown();

        let session = self.session.id();
        let tick_tx = self.events.clone();
        let expire_tx = self.events.clone();
        self.countdown = Some(countdown::start_with_interval(
            self.duration_seconds,
            self.tick_interval,
            move |remaining| {
                let _ = tick_tx.send(WorkerEvent::CountdownTick { session, remaining });
            },
            move || {
                let _ = expire_tx.send(WorkerEvent::TimerExpired { session });
            },
        ));
        Ok(())
    }

    /// TimerExpired: Running → AwaitingCompletion. The task stays in the list.
    fn timer_expired(&mut self) -> Result<(), SessionError> {
        if self.phase() != Phase::Running {
            return Err(self.invalid(Transition::TimerExpired));
        }
        self.session.set_remaining(0);
        self.session.await_completion();
        self.countdown = None;
        Ok(())
    }

    /// CloseRequestedWithActiveTask: cancel the countdown if Running and
    /// move to AwaitingCompletion. Already awaiting is left as is.
    pub fn interrupt(&mut self) -> Result<&Task, SessionError> {
        match self.phase() {
            Phase::Running => {
                self.stop_countdown();
                self.session.await_completion();
            }
            Phase::AwaitingCompletion => {}
            _ => return Err(self.invalid(Transition::CloseRequested)),
        }
        self.session
            .current_task()
            .ok_or(SessionError::InvalidTransition {
                phase: Phase::AwaitingCompletion,
                transition: Transition::CloseRequested,
            })
    }

    /// CompletionAnswered: AwaitingCompletion → Idle.
    ///
    /// The task is removed from `store` only when `completed` is true.
    pub fn completion_answered(
        &mut self,
        completed: bool,
        store: &mut TaskStore,
    ) -> Result<CompletionOutcome, SessionError> {
        if self.phase() != Phase::AwaitingCompletion {
            return Err(self.invalid(Transition::CompletionAnswered));
        }
        self.stop_countdown();
        let task = self
            .session
            .finish()
            .ok_or(SessionError::InvalidTransition {
                phase: Phase::Idle,
                transition: Transition::CompletionAnswered,
            })?;

        let (removed, save_error) = if completed {
            match store.remove(&task) {
                Ok(removed) => (removed, None),
                // Memory was updated before the write failed
                Err(e) => (true, Some(e)),
            }
        } else {
            (false, None)
        };

        Ok(CompletionOutcome {
            task,
            completed,
            removed,
            save_error,
        })
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.cancel();
        }
    }
}
