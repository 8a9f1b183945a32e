//! Deployment environment snapshot.
//!
//! Service credentials and deployment-wide defaults are read once from the
//! process environment and passed into the dispatcher. Tests build the same
//! snapshot from literal pairs instead of mutating the process environment.

use fancall_types::AgentPersona;
use fancall_voice::{LiveKitConfig, VoiceError};
use std::collections::HashMap;
use std::fmt;

pub const FISH_API_KEY: &str = "FISH_API_KEY";
pub const FISH_AUDIO_REFERENCE_ID: &str = "FISH_AUDIO_REFERENCE_ID";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const LIVEKIT_URL: &str = "LIVEKIT_URL";
pub const LIVEKIT_API_KEY: &str = "LIVEKIT_API_KEY";
pub const LIVEKIT_API_SECRET: &str = "LIVEKIT_API_SECRET";
pub const HEDRA_ENABLED: &str = "HEDRA_ENABLED";
pub const HEDRA_API_KEY: &str = "HEDRA_API_KEY";
pub const HEDRA_AVATAR_ID: &str = "HEDRA_AVATAR_ID";

/// Values that must be present before the agent joins a room.
///
/// Capability credentials (`FISH_API_KEY`, `HEDRA_API_KEY`) are checked by
/// the capability initializer instead.
pub const REQUIRED_VARS: [&str; 4] = [
    OPENAI_API_KEY,
    LIVEKIT_URL,
    LIVEKIT_API_KEY,
    LIVEKIT_API_SECRET,
];

const KNOWN_VARS: [&str; 9] = [
    FISH_API_KEY,
    FISH_AUDIO_REFERENCE_ID,
    OPENAI_API_KEY,
    LIVEKIT_URL,
    LIVEKIT_API_KEY,
    LIVEKIT_API_SECRET,
    HEDRA_ENABLED,
    HEDRA_API_KEY,
    HEDRA_AVATAR_ID,
];

/// Read-only view of the deployment environment.
///
/// Empty values are treated as unset.
#[derive(Clone, Default)]
pub struct DeploymentEnv {
    vars: HashMap<String, String>,
}

impl fmt::Debug for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("DeploymentEnv").field("set", &keys).finish()
    }
}

impl DeploymentEnv {
    /// Captures the known deployment variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_pairs(
            KNOWN_VARS
                .iter()
                .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value))),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Names of required values that are missing, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect()
    }

    /// Whether avatar rendering is turned on for this deployment.
    pub fn avatar_enabled(&self) -> bool {
        self.get(HEDRA_ENABLED)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn speech_api_key(&self) -> Option<&str> {
        self.get(FISH_API_KEY)
    }

    pub fn llm_api_key(&self) -> Option<&str> {
        self.get(OPENAI_API_KEY)
    }

    pub fn avatar_api_key(&self) -> Option<&str> {
        self.get(HEDRA_API_KEY)
    }

    /// Deployment-level defaults for persona fields.
    ///
    /// Only the voice reference and the avatar id have deployment defaults.
    pub fn persona_defaults(&self) -> AgentPersona {
        AgentPersona {
            avatar_id: self.get(HEDRA_AVATAR_ID).map(str::to_string),
            voice_id: self.get(FISH_AUDIO_REFERENCE_ID).map(str::to_string),
            ..AgentPersona::default()
        }
    }

    /// LiveKit connection settings, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` when only some of the LiveKit values are set.
    pub fn livekit_config(&self) -> Result<Option<LiveKitConfig>, VoiceError> {
        LiveKitConfig::from_parts(
            self.get(LIVEKIT_URL),
            self.get(LIVEKIT_API_KEY),
            self.get(LIVEKIT_API_SECRET),
        )
    }
}
