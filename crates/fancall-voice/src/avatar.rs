//! Avatar rendering capability.

use crate::error::VoiceError;
use image::RgbImage;
use std::fmt;

/// Where the rendered avatar comes from.
///
/// `ById` always wins over `ByImage` when both could be produced; `None`
/// means no avatar is rendered for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AvatarSource {
    #[default]
    None,
    /// An avatar already registered with the rendering service.
    ById(String),
    /// An avatar generated from a decoded profile picture.
    ByImage(RgbImage),
}

impl AvatarSource {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ById(_) => "avatar_id",
            Self::ByImage(_) => "image",
        }
    }
}

/// Hedra avatar session capability.
#[derive(Clone)]
pub struct HedraAvatar {
    api_key: String,
    source: AvatarSource,
    idle_video_url: Option<String>,
}

impl fmt::Debug for HedraAvatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            AvatarSource::None => "none".to_string(),
            AvatarSource::ById(id) => format!("id:{}", id),
            AvatarSource::ByImage(img) => format!("image:{}x{}", img.width(), img.height()),
        };
        f.debug_struct("HedraAvatar")
            .field("api_key", &"[REDACTED]")
            .field("source", &source)
            .field("idle_video_url", &self.idle_video_url)
            .finish()
    }
}

impl HedraAvatar {
    /// Creates an avatar session from a concrete source.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the API key is empty or the source is
    /// `AvatarSource::None`.
    pub fn new(
        api_key: impl Into<String>,
        source: AvatarSource,
        idle_video_url: Option<String>,
    ) -> Result<Self, VoiceError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(VoiceError::Config(
                "Hedra API key must not be empty".to_string(),
            ));
        }
        match &source {
            AvatarSource::None => {
                return Err(VoiceError::Config(
                    "Hedra avatar needs an avatar id or an image".to_string(),
                ))
            }
            AvatarSource::ById(id) if id.is_empty() => {
                return Err(VoiceError::Config(
                    "Hedra avatar id must not be empty".to_string(),
                ))
            }
            AvatarSource::ById(_) | AvatarSource::ByImage(_) => {}
        }
        Ok(Self {
            api_key,
            source,
            idle_video_url,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn source(&self) -> &AvatarSource {
        &self.source
    }

    pub fn idle_video_url(&self) -> Option<&str> {
        self.idle_video_url.as_deref()
    }
}
