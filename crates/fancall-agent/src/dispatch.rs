//! Dispatch entrypoint.
//!
//! One [`Dispatcher`] is built per worker and shared read-only across jobs.
//! Each job gets a [`JobContext`] carrying its room, raw metadata,
//! cancellation token, and state channel.

use crate::config::Config;
use crate::env::DeploymentEnv;
use crate::error::DispatchError;
use crate::initializer::CapabilityInitializer;
use crate::lifecycle::{
    conclude, DispatchOutcome, SessionController, SessionState, CANCELLED_BEFORE_START,
    TRIAL_DURATION,
};
use crate::resolver::resolve;
use fancall_types::{AgentPersona, DispatchRequest, ShutdownReason};
use fancall_voice::{
    AcquisitionError, Capabilities, HttpImageAcquirer, ImageAcquirer, Room, DEFAULT_LLM_MODEL,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Per-job inputs handed to [`Dispatcher::dispatch`].
pub struct JobContext<R> {
    pub room: R,
    pub metadata: Option<String>,
    cancel: CancellationToken,
    state: watch::Sender<SessionState>,
}

impl<R: Room> JobContext<R> {
    pub fn new(room: R, metadata: Option<String>) -> Self {
        let (state, _) = watch::channel(SessionState::Pending);
        Self {
            room,
            metadata,
            cancel: CancellationToken::new(),
            state,
        }
    }

    /// Token that cancels the running session when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receiver for session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

/// Runs companion sessions against rooms.
pub struct Dispatcher<A = HttpImageAcquirer> {
    env: DeploymentEnv,
    persona: AgentPersona,
    llm_model: String,
    acquirer: A,
    trial_duration: Duration,
}

impl Dispatcher<HttpImageAcquirer> {
    /// Builds a dispatcher from loaded configuration and the deployment environment.
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionError` if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config, env: DeploymentEnv) -> Result<Self, AcquisitionError> {
        let acquirer = HttpImageAcquirer::new(config.agent.image_fetch_timeout())?;
        Ok(Self::new(env, config.persona.clone(), acquirer).with_llm_model(&config.agent.llm_model))
    }
}

impl<A: ImageAcquirer> Dispatcher<A> {
    pub fn new(env: DeploymentEnv, persona: AgentPersona, acquirer: A) -> Self {
        Self {
            env,
            persona,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            acquirer,
            trial_duration: TRIAL_DURATION,
        }
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    /// Overrides the free trial length.
    pub fn with_trial_duration(mut self, duration: Duration) -> Self {
        self.trial_duration = duration;
        self
    }

    pub fn trial_duration(&self) -> Duration {
        self.trial_duration
    }

    /// Validates the environment, parses metadata, and initializes capabilities.
    ///
    /// No room interaction happens here.
    ///
    /// # Errors
    ///
    /// Returns the first `DispatchError` encountered, in that order.
    pub async fn prepare(&self, metadata: Option<&str>) -> Result<Capabilities, DispatchError> {
        let missing = self.env.missing_required();
        if !missing.is_empty() {
            return Err(DispatchError::Environment(missing));
        }

        let request = DispatchRequest::from_metadata(metadata)?;
        let resolved = resolve(&request, &self.env.persona_defaults(), &self.persona);

        CapabilityInitializer::new(&self.env, &self.llm_model, &self.acquirer)
            .initialize(&resolved)
            .await
    }

    /// Runs one job to completion and reports why it ended.
    ///
    /// Cancellation is honoured at every stage: while capabilities are being
    /// prepared or the room is joining, the job ends as cancelled without a
    /// session being started. The room is always shut down with the returned
    /// reason.
    pub async fn dispatch<R: Room>(&self, ctx: JobContext<R>) -> DispatchOutcome {
        let JobContext {
            mut room,
            metadata,
            cancel,
            state,
        } = ctx;
        info!(room = room.name(), "dispatch received");

        let prepared = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            prepared = self.prepare(metadata.as_deref()) => Some(prepared),
        };
        let capabilities = match prepared {
            Some(Ok(capabilities)) => capabilities,
            Some(Err(e)) => return conclude(&mut room, &state, e.shutdown_reason(), e.to_string()),
            None => return cancelled(&mut room, &state),
        };

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            connected = room.connect() => Some(connected),
        };
        match connected {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                let e = DispatchError::Room(e);
                return conclude(&mut room, &state, e.shutdown_reason(), e.to_string());
            }
            None => return cancelled(&mut room, &state),
        }

        SessionController::new(room, self.trial_duration, state)
            .run(capabilities, cancel)
            .await
    }
}

fn cancelled<R: Room>(room: &mut R, state: &watch::Sender<SessionState>) -> DispatchOutcome {
    conclude(
        room,
        state,
        ShutdownReason::Cancelled,
        CANCELLED_BEFORE_START.to_string(),
    )
}
