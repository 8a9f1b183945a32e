//! Session lifecycle for one dispatch.
//!
//! A session moves through `Pending -> Created -> Started -> Running` and
//! then terminates exactly once, either when the free trial elapses or when
//! the job is cancelled. Termination consumes the session handle, so a
//! second shutdown cannot be expressed.

use fancall_types::ShutdownReason;
use fancall_voice::{Capabilities, Room};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Length of a free trial session.
pub const TRIAL_DURATION: Duration = Duration::from_secs(75);

/// Observable state of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Created,
    Started,
    Running,
    Terminated(ShutdownReason),
}

impl SessionState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub reason: ShutdownReason,
    pub message: String,
}

impl DispatchOutcome {
    pub fn is_fault(&self) -> bool {
        self.reason.is_fault()
    }
}

/// Publishes the terminal state, logs, and shuts the room down.
pub(crate) fn conclude<R: Room>(
    room: &mut R,
    state: &watch::Sender<SessionState>,
    reason: ShutdownReason,
    message: String,
) -> DispatchOutcome {
    state.send_replace(SessionState::Terminated(reason));
    if reason.is_fault() {
        error!(room = room.name(), reason = reason.as_str(), "{}", message);
    } else {
        info!(room = room.name(), reason = reason.as_str(), "{}", message);
    }
    room.shutdown(reason.as_str());
    DispatchOutcome { reason, message }
}

/// A started session. Owns the room until it is terminated.
pub struct SessionHandle<R> {
    room: R,
    capabilities: Capabilities,
}

impl<R: Room> SessionHandle<R> {
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Ends the session. Consumes the handle.
    pub fn terminate(
        mut self,
        state: &watch::Sender<SessionState>,
        reason: ShutdownReason,
        message: String,
    ) -> DispatchOutcome {
        conclude(&mut self.room, state, reason, message)
    }
}

/// Drives a connected room through the trial session.
pub struct SessionController<R> {
    room: R,
    trial_duration: Duration,
    state: watch::Sender<SessionState>,
}

impl<R: Room> SessionController<R> {
    pub fn new(room: R, trial_duration: Duration, state: watch::Sender<SessionState>) -> Self {
        state.send_replace(SessionState::Created);
        Self {
            room,
            trial_duration,
            state,
        }
    }

    /// Starts the session and waits for the trial limit or cancellation.
    ///
    /// A token that is already cancelled ends the job without starting a
    /// session. When both are ready at the same instant, cancellation wins.
    pub async fn run(mut self, capabilities: Capabilities, cancel: CancellationToken) -> DispatchOutcome {
        if cancel.is_cancelled() {
            return conclude(
                &mut self.room,
                &self.state,
                ShutdownReason::Cancelled,
                CANCELLED_BEFORE_START.to_string(),
            );
        }
        if let Err(e) = self.room.start_session(&capabilities).await {
            return conclude(
                &mut self.room,
                &self.state,
                ShutdownReason::RoomUnavailable,
                format!("Failed to start agent session: {}", e),
            );
        }
        self.state.send_replace(SessionState::Started);

        let handle = SessionHandle {
            room: self.room,
            capabilities,
        };
        self.state.send_replace(SessionState::Running);
        info!(
            room = handle.room.name(),
            trial_secs = self.trial_duration.as_secs(),
            "agent session running"
        );

        let (reason, message) = wait_for_trial_end(&cancel, self.trial_duration).await;
        handle.terminate(&self.state, reason, message)
    }
}

pub(crate) const CANCELLED_BEFORE_START: &str = "Agent job cancelled before session start";

/// Races the trial timer against cancellation. Cancellation is polled first.
async fn wait_for_trial_end(
    cancel: &CancellationToken,
    trial_duration: Duration,
) -> (ShutdownReason, String) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => (
            ShutdownReason::Cancelled,
            "Agent session cancelled before trial limit".to_string(),
        ),
        _ = tokio::time::sleep(trial_duration) => (
            ShutdownReason::TrialLimitReached,
            format!(
                "Free trial session limit reached ({} seconds)",
                trial_duration.as_secs()
            ),
        ),
    }
}
