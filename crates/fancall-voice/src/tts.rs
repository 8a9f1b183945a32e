use crate::error::VoiceError;
use std::fmt;

/// Fish Audio text-to-speech capability.
///
/// Holds the credential and the optional voice reference the synthesis
/// backend is driven with. Without a reference the backend's default voice
/// is used.
#[derive(Clone)]
pub struct FishAudioTts {
    api_key: String,
    reference_id: Option<String>,
}

impl fmt::Debug for FishAudioTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FishAudioTts")
            .field("api_key", &"[REDACTED]")
            .field("reference_id", &self.reference_id)
            .finish()
    }
}

impl FishAudioTts {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the API key is empty.
    pub fn new(
        api_key: impl Into<String>,
        reference_id: Option<String>,
    ) -> Result<Self, VoiceError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(VoiceError::Config(
                "Fish Audio API key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            reference_id,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Voice reference id, if one was resolved.
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}
