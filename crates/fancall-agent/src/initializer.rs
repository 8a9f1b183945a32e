//! Capability initialization.
//!
//! Credentials for every requested capability are checked before any image
//! is decoded or fetched, so a misconfigured deployment fails without side
//! effects.

use crate::env::{DeploymentEnv, FISH_API_KEY, HEDRA_API_KEY, OPENAI_API_KEY};
use crate::error::{AvatarSourceError, CredentialError, DispatchError};
use crate::prompts::{compose_instructions, truncate_for_log, DEFAULT_SYSTEM_PROMPT};
use crate::resolver::ResolvedConfig;
use fancall_voice::{
    AvatarSource, Capabilities, FishAudioTts, HedraAvatar, ImageAcquirer, OpenAiLlm,
};
use tracing::info;

struct Credentials<'e> {
    speech: &'e str,
    llm: &'e str,
    avatar: Option<&'e str>,
}

/// Builds the capabilities a companion session is started with.
pub struct CapabilityInitializer<'a, A> {
    env: &'a DeploymentEnv,
    llm_model: &'a str,
    acquirer: &'a A,
}

impl<'a, A: ImageAcquirer> CapabilityInitializer<'a, A> {
    pub fn new(env: &'a DeploymentEnv, llm_model: &'a str, acquirer: &'a A) -> Self {
        Self {
            env,
            llm_model,
            acquirer,
        }
    }

    /// Validates credentials, sources the avatar, and constructs every capability.
    ///
    /// # Errors
    ///
    /// - `DispatchError::Credential` when a credential is missing
    /// - `DispatchError::AvatarSource` when avatar mode is on and no usable
    ///   avatar id or image reference resolves
    /// - `DispatchError::Capability` when a capability rejects its settings
    pub async fn initialize(&self, resolved: &ResolvedConfig) -> Result<Capabilities, DispatchError> {
        let credentials = self.credentials()?;

        // The avatar key is present exactly when avatar mode is enabled.
        let avatar = match credentials.avatar {
            Some(key) => {
                let source = select_avatar_source(resolved, true, self.acquirer).await?;
                Some(
                    HedraAvatar::new(key, source, resolved.idle_video_url().map(str::to_string))
                        .map_err(DispatchError::Capability)?,
                )
            }
            None => None,
        };

        let llm = OpenAiLlm::new(credentials.llm, self.llm_model).map_err(DispatchError::Capability)?;

        // An explicit empty voice id clears the reference: the default voice is used.
        let voice_id = resolved.voice_id().filter(|v| !v.is_empty());
        if let Some(voice_id) = voice_id {
            info!(voice_id, "using Fish Audio voice");
        }
        let tts = FishAudioTts::new(credentials.speech, voice_id.map(str::to_string))
            .map_err(DispatchError::Capability)?;

        let instructions = compose_instructions(
            resolved.system_prompt().unwrap_or(DEFAULT_SYSTEM_PROMPT),
            true,
        );
        info!(
            instructions = %truncate_for_log(&instructions),
            "composed agent instructions"
        );

        Ok(Capabilities {
            llm,
            tts,
            avatar,
            instructions,
        })
    }

    fn credentials(&self) -> Result<Credentials<'a>, CredentialError> {
        let speech = self.env.speech_api_key().ok_or(CredentialError {
            var: FISH_API_KEY,
            capability: "Fish Audio speech synthesis",
        })?;
        let llm = self.env.llm_api_key().ok_or(CredentialError {
            var: OPENAI_API_KEY,
            capability: "the OpenAI language model",
        })?;
        let avatar = if self.env.avatar_enabled() {
            Some(self.env.avatar_api_key().ok_or(CredentialError {
                var: HEDRA_API_KEY,
                capability: "the Hedra avatar",
            })?)
        } else {
            None
        };
        Ok(Credentials {
            speech,
            llm,
            avatar,
        })
    }
}

/// Picks the avatar source for a dispatch.
///
/// Returns `AvatarSource::None` when avatar mode is off. Otherwise an avatar
/// id wins and the image acquirer is never invoked; without one the profile
/// picture is acquired.
///
/// # Errors
///
/// Returns `AvatarSourceError` when avatar mode is on and neither source is
/// usable.
pub async fn select_avatar_source<A: ImageAcquirer>(
    resolved: &ResolvedConfig,
    avatar_enabled: bool,
    acquirer: &A,
) -> Result<AvatarSource, AvatarSourceError> {
    if !avatar_enabled {
        return Ok(AvatarSource::None);
    }

    if let Some(avatar) = &resolved.avatar_id {
        if avatar.value.is_empty() {
            return Err(AvatarSourceError::EmptyAvatarId);
        }
        info!(
            avatar_id = %avatar.value,
            source = avatar.source.as_str(),
            "Hedra avatar is enabled with avatar_id"
        );
        return Ok(AvatarSource::ById(avatar.value.clone()));
    }

    match resolved.profile_picture_url() {
        Some(url) => {
            info!(
                profile_picture_url = %truncate_for_log(url),
                "Hedra avatar is enabled with profile_picture_url"
            );
            let image = acquirer.acquire(url).await?;
            Ok(AvatarSource::ByImage(image))
        }
        None => Err(AvatarSourceError::NoAvatarSource),
    }
}
