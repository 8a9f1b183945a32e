//! Shared types for the Fancall companion agent.
//!
//! This crate holds the wire contract for dispatch metadata, the persona
//! defaults that back it, and the enumerated reasons a companion session can
//! end with. Both `fancall-voice` and `fancall-agent` depend on it; it depends
//! on nothing inside the workspace.

pub mod persona;

pub use persona::{AgentPersona, DispatchRequest};

use serde::{Deserialize, Serialize};

/// Terminal causes for a dispatched companion session.
///
/// Every path that ends a dispatch carries exactly one of these. The room is
/// told about it even when the session simply ran out its trial window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShutdownReason {
    /// The trial window elapsed without interruption.
    TrialLimitReached,
    /// An external cancellation signal arrived before the trial window elapsed.
    Cancelled,
    /// The job metadata could not be parsed as a dispatch request.
    InvalidMetadata,
    /// A service credential needed by a requested capability is missing.
    MissingCredentials,
    /// The avatar could not be sourced from an id or an image reference.
    InvalidAvatarSource,
    /// A required deployment value is missing from the environment.
    MissingEnv,
    /// The room could not be joined or the agent session could not be started.
    RoomUnavailable,
}

impl ShutdownReason {
    /// Returns the canonical kebab-case label for this reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrialLimitReached => "trial-limit-reached",
            Self::Cancelled => "cancelled",
            Self::InvalidMetadata => "invalid-metadata",
            Self::MissingCredentials => "missing-credentials",
            Self::InvalidAvatarSource => "invalid-avatar-source",
            Self::MissingEnv => "missing-env",
            Self::RoomUnavailable => "room-unavailable",
        }
    }

    /// Returns `true` when the session ended because something went wrong.
    ///
    /// Trial completion and external cancellation are graceful endings; every
    /// other reason is a fault.
    pub fn is_fault(self) -> bool {
        !matches!(self, Self::TrialLimitReached | Self::Cancelled)
    }
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShutdownReason {
    type Err = ParseShutdownReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial-limit-reached" => Ok(Self::TrialLimitReached),
            "cancelled" => Ok(Self::Cancelled),
            "invalid-metadata" => Ok(Self::InvalidMetadata),
            "missing-credentials" => Ok(Self::MissingCredentials),
            "invalid-avatar-source" => Ok(Self::InvalidAvatarSource),
            "missing-env" => Ok(Self::MissingEnv),
            "room-unavailable" => Ok(Self::RoomUnavailable),
            _ => Err(ParseShutdownReasonError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown shutdown reason string.
#[derive(Debug, Clone)]
pub struct ParseShutdownReasonError(pub String);

impl std::fmt::Display for ParseShutdownReasonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown shutdown reason: {}", self.0)
    }
}

impl std::error::Error for ParseShutdownReasonError {}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ShutdownReason; 7] = [
        ShutdownReason::TrialLimitReached,
        ShutdownReason::Cancelled,
        ShutdownReason::InvalidMetadata,
        ShutdownReason::MissingCredentials,
        ShutdownReason::InvalidAvatarSource,
        ShutdownReason::MissingEnv,
        ShutdownReason::RoomUnavailable,
    ];

    #[test]
    fn labels_parse_back() {
        for reason in ALL {
            assert_eq!(reason.as_str().parse::<ShutdownReason>().unwrap(), reason);
        }
        assert!("timeout".parse::<ShutdownReason>().is_err());
    }

    #[test]
    fn only_trial_and_cancel_are_graceful() {
        let graceful: Vec<_> = ALL.into_iter().filter(|r| !r.is_fault()).collect();
        assert_eq!(
            graceful,
            vec![ShutdownReason::TrialLimitReached, ShutdownReason::Cancelled]
        );
    }

    #[test]
    fn serde_uses_kebab_labels() {
        let json = serde_json::to_string(&ShutdownReason::MissingEnv).unwrap();
        assert_eq!(json, "\"missing-env\"");
    }
}
