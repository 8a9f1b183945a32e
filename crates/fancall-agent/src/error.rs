//! Dispatch failure taxonomy.

use fancall_types::ShutdownReason;
use fancall_voice::{AcquisitionError, VoiceError};
use thiserror::Error;

/// A service credential needed by a requested capability is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{var} is required for {capability}")]
pub struct CredentialError {
    pub var: &'static str,
    pub capability: &'static str,
}

/// The avatar could not be sourced.
#[derive(Debug, Error)]
pub enum AvatarSourceError {
    #[error("no avatar_id or profile_picture_url found for Hedra avatar")]
    NoAvatarSource,

    #[error("avatar_id must not be empty")]
    EmptyAvatarId,

    #[error("profile_picture_url could not be used: {0}")]
    Acquisition(#[from] AcquisitionError),
}

/// Any failure that ends a dispatch before or instead of a running session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid job metadata format: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("missing environment variables: {}", .0.join(", "))]
    Environment(Vec<&'static str>),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    AvatarSource(#[from] AvatarSourceError),

    /// A capability rejected a deployment setting such as the model name.
    ///
    /// `load_config` rejects blank settings, so this is reported as a
    /// deployment problem (`missing-env`) rather than a request problem.
    #[error("capability setup failed: {0}")]
    Capability(VoiceError),

    #[error("room unavailable: {0}")]
    Room(VoiceError),
}

impl DispatchError {
    /// The shutdown reason reported to the room for this failure.
    pub fn shutdown_reason(&self) -> ShutdownReason {
        match self {
            Self::Metadata(_) => ShutdownReason::InvalidMetadata,
            Self::Environment(_) | Self::Capability(_) => ShutdownReason::MissingEnv,
            Self::Credential(_) => ShutdownReason::MissingCredentials,
            Self::AvatarSource(_) => ShutdownReason::InvalidAvatarSource,
            Self::Room(_) => ShutdownReason::RoomUnavailable,
        }
    }
}
