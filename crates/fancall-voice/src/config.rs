use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_token_ttl_seconds() -> u64 {
    3600
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    pub url: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for agent join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    /// Builds a config from optional parts, requiring all three or none.
    ///
    /// Returns `Ok(None)` when every part is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` when only some of the parts are provided.
    pub fn from_parts(
        url: Option<&str>,
        api_key: Option<&str>,
        api_secret: Option<&str>,
    ) -> Result<Option<Self>, VoiceError> {
        let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
        match (present(url), present(api_key), present(api_secret)) {
            (true, true, true) => Ok(Some(Self::new(
                url.unwrap_or_default(),
                api_key.unwrap_or_default(),
                api_secret.unwrap_or_default(),
            ))),
            (false, false, false) => Ok(None),
            _ => Err(VoiceError::Config(
                "LiveKit URL, API key and API secret must be provided together".to_string(),
            )),
        }
    }
}
