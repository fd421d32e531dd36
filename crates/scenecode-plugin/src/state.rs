//! Single-flight run state.

use std::sync::Mutex;

use tracing::debug;

/// Lifecycle of the current conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Admits one conversion at a time. Requests made while one is running
/// are refused, not queued.
#[derive(Debug, Default)]
pub struct SingleFlight {
    state: Mutex<RunState>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    /// Enter `Running`, unless a run is already in progress.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        let mut state = self.state.lock().ok()?;
        if *state == RunState::Running {
            debug!("conversion already running, ignoring request");
            return None;
        }
        *state = RunState::Running;
        debug!("run state: running");
        Some(FlightGuard {
            flight: self,
            finished: false,
        })
    }

    fn set(&self, next: RunState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
        debug!(state = ?next, "run state changed");
    }
}

/// Held for the duration of a run. Dropping it without finishing, for
/// example when the run future is cancelled, returns to `Idle`.
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
    finished: bool,
}

impl FlightGuard<'_> {
    pub fn succeed(mut self) {
        self.finished = true;
        self.flight.set(RunState::Succeeded);
    }

    /// Record the failure and release the guard back to `Idle`.
    pub fn fail(mut self) {
        self.finished = true;
        self.flight.set(RunState::Failed);
        self.flight.set(RunState::Idle);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.flight.set(RunState::Idle);
        }
    }
}
