use crate::error::VoiceError;
use std::fmt;

/// Model used when no override is configured.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat model capability backing the companion's replies.
#[derive(Clone)]
pub struct OpenAiLlm {
    api_key: String,
    model: String,
}

impl fmt::Debug for OpenAiLlm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiLlm")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiLlm {
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the API key or model name is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, VoiceError> {
        let api_key = api_key.into();
        let model = model.into();
        if api_key.is_empty() {
            return Err(VoiceError::Config(
                "OpenAI API key must not be empty".to_string(),
            ));
        }
        if model.is_empty() {
            return Err(VoiceError::Config("LLM model must not be empty".to_string()));
        }
        Ok(Self { api_key, model })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
