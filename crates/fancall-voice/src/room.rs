use crate::capabilities::Capabilities;
use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// The room a companion session is bound to.
///
/// Transport and media internals live behind this trait; the dispatcher only
/// joins, starts the agent session, and tells the room why it is ending.
pub trait Room: Send {
    /// Room name, used for log context.
    fn name(&self) -> &str;

    /// Joins the room.
    fn connect(&mut self) -> impl Future<Output = Result<(), VoiceError>> + Send;

    /// Starts the agent session on the joined room.
    fn start_session(
        &mut self,
        capabilities: &Capabilities,
    ) -> impl Future<Output = Result<(), VoiceError>> + Send;

    /// Ends the job, reporting why.
    fn shutdown(&mut self, reason: &str);
}

/// Mints a join token for the agent participant.
///
/// # Errors
///
/// Returns `VoiceError::LiveKit` if the token cannot be signed.
pub fn generate_agent_token(
    config: &LiveKitConfig,
    room_name: &str,
    identity: &str,
    display_name: &str,
) -> Result<String, VoiceError> {
    let token = AccessToken::with_api_key(&config.api_key, &config.api_secret)
        .with_identity(identity)
        .with_name(display_name)
        .with_grants(VideoGrants {
            room_join: true,
            room: room_name.to_string(),
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
            ..Default::default()
        })
        .with_ttl(Duration::from_secs(config.token_ttl_seconds));

    token.to_jwt().map_err(VoiceError::LiveKit)
}

/// A LiveKit room joined as the companion agent.
///
/// Media transport is owned by the LiveKit agent runtime; this type holds the
/// join credentials and session bookkeeping the dispatcher needs.
#[derive(Debug)]
pub struct LiveKitRoom {
    config: LiveKitConfig,
    room_name: String,
    identity: String,
    agent_name: String,
    token: Option<String>,
    session_started: bool,
    shutdown_reason: Option<String>,
}

impl LiveKitRoom {
    pub fn new(
        config: LiveKitConfig,
        room_name: impl Into<String>,
        identity: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            room_name: room_name.into(),
            identity: identity.into(),
            agent_name: agent_name.into(),
            token: None,
            session_started: false,
            shutdown_reason: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.token.is_some()
    }

    /// Join token issued on connect.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Reason passed to [`Room::shutdown`], if the job has ended.
    pub fn shutdown_reason(&self) -> Option<&str> {
        self.shutdown_reason.as_deref()
    }
}

impl Room for LiveKitRoom {
    fn name(&self) -> &str {
        &self.room_name
    }

    async fn connect(&mut self) -> Result<(), VoiceError> {
        if self.shutdown_reason.is_some() {
            return Err(VoiceError::RoomService(format!(
                "room '{}' has already been shut down",
                self.room_name
            )));
        }
        let token = generate_agent_token(
            &self.config,
            &self.room_name,
            &self.identity,
            &self.agent_name,
        )?;
        info!(
            room = %self.room_name,
            url = %self.config.url,
            identity = %self.identity,
            token_len = token.len(),
            "agent join token issued"
        );
        self.token = Some(token);
        Ok(())
    }

    async fn start_session(&mut self, capabilities: &Capabilities) -> Result<(), VoiceError> {
        if !self.is_connected() {
            return Err(VoiceError::RoomService(
                "Agent is not connected to a room".to_string(),
            ));
        }
        if self.session_started {
            return Err(VoiceError::RoomService(format!(
                "agent session already running in room '{}'",
                self.room_name
            )));
        }
        info!(
            room = %self.room_name,
            model = capabilities.llm.model(),
            voice = capabilities.tts.reference_id().unwrap_or("<default>"),
            avatar = capabilities
                .avatar
                .as_ref()
                .map_or("none", |a| a.source().kind()),
            "agent session handed to runtime"
        );
        self.session_started = true;
        Ok(())
    }

    fn shutdown(&mut self, reason: &str) {
        if let Some(previous) = &self.shutdown_reason {
            warn!(
                room = %self.room_name,
                previous = %previous,
                reason,
                "room already shut down, ignoring"
            );
            return;
        }
        info!(room = %self.room_name, reason, "shutting down agent job");
        self.shutdown_reason = Some(reason.to_string());
        self.session_started = false;
        self.token = None;
    }
}
