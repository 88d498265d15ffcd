use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Real-time interval between two countdown ticks
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Default)]
struct Signal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl Signal {
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    fn cancel(&self) {
        *self.flag() = true;
        self.wake.notify_all();
    }

    /// Sleep for `timeout` unless cancelled first. Returns true if cancelled.
    fn sleep(&self, timeout: Duration) -> bool {
        let guard = self.flag();
        let (guard, _) = self
            .wake
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Handle to a running countdown. Dropping the handle cancels it.
pub struct CancelHandle {
    signal: Arc<Signal>,
    worker: Option<JoinHandle<()>>,
}

impl CancelHandle {
    /// Stop the countdown. `on_expire` will not run. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.signal.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Whether the worker thread has returned (expired or cancelled)
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    /// Block until the worker thread returns
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.signal.cancel();
    }
}

/// Count down from `duration_seconds` to 0, one tick per second.
///
/// `on_tick` receives every value from `duration_seconds` down to 0 inclusive.
/// `on_expire` runs once after the 0 tick unless the countdown was cancelled.
/// Both callbacks run on the countdown's worker thread.
pub fn start<T, E>(duration_seconds: u64, on_tick: T, on_expire: E) -> CancelHandle
where
    T: FnMut(u64) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    start_with_interval(duration_seconds, TICK, on_tick, on_expire)
}

/// `start` with a custom tick interval
pub fn start_with_interval<T, E>(
    duration_seconds: u64,
    interval: Duration,
    mut on_tick: T,
    on_expire: E,
) -> CancelHandle
where
    T: FnMut(u64) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let signal = Arc::new(Signal::default());
    let worker_signal = Arc::clone(&signal);

    let worker = thread::spawn(move || {
        let mut remaining = duration_seconds;
        loop {
            if worker_signal.is_cancelled() {
                return;
            }
            on_tick(remaining);
            if remaining == 0 {
                break;
            }
            if worker_signal.sleep(interval) {
                return;
            }
            remaining -= 1;
        }
        if !worker_signal.is_cancelled() {
            on_expire();
        }
    });

    CancelHandle {
        signal,
        worker: Some(worker),
    }
}
