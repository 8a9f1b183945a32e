//! Agent persona and dispatch request definitions.
//!
//! An `AgentPersona` describes who the companion is: which avatar it shows,
//! which voice it speaks with, and the system prompt it is given. A dispatch
//! request carries the same field set; any field it leaves out falls back to
//! deployment defaults and then to the persona configured at startup.

use serde::{Deserialize, Serialize};

/// The identity of a companion agent.
///
/// Every field is optional. Keys are camelCase on the wire; snake_case keys
/// are accepted as well. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPersona {
    /// Avatar id registered with the avatar rendering service.
    #[serde(default, alias = "avatar_id")]
    pub avatar_id: Option<String>,
    /// Profile picture used to generate an avatar when no avatar id is known.
    ///
    /// Either an inline `data:image/...;base64,...` reference or an
    /// `http(s)://` URL.
    #[serde(default, alias = "profile_picture_url")]
    pub profile_picture_url: Option<String>,
    /// Video to display while the avatar is idle.
    #[serde(default, alias = "idle_video_url")]
    pub idle_video_url: Option<String>,
    /// Voice reference id for speech synthesis.
    #[serde(default, alias = "voice_id")]
    pub voice_id: Option<String>,
    /// System prompt for the agent.
    #[serde(default, alias = "system_prompt")]
    pub system_prompt: Option<String>,
}

/// Inbound dispatch metadata.
///
/// Shares the persona field set so hosts can forward a stored persona as-is.
pub type DispatchRequest = AgentPersona;

impl AgentPersona {
    /// Parses job metadata into a request.
    ///
    /// Absent or blank metadata yields the all-default request.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json::Error` when the metadata is not a
    /// JSON object matching the request contract.
    pub fn from_metadata(metadata: Option<&str>) -> Result<Self, serde_json::Error> {
        match metadata {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_camel_case_fields() {
        let raw = json!({
            "avatarId": "avatar_456",
            "profilePictureUrl": "https://example.com/pic.jpg",
            "idleVideoUrl": "https://example.com/idle.mp4",
            "voiceId": "voice_789",
            "systemPrompt": "You are helpful."
        })
        .to_string();

        let request = DispatchRequest::from_metadata(Some(&raw)).unwrap();
        assert_eq!(request.avatar_id.as_deref(), Some("avatar_456"));
        assert_eq!(
            request.profile_picture_url.as_deref(),
            Some("https://example.com/pic.jpg")
        );
        assert_eq!(
            request.idle_video_url.as_deref(),
            Some("https://example.com/idle.mp4")
        );
        assert_eq!(request.voice_id.as_deref(), Some("voice_789"));
        assert_eq!(request.system_prompt.as_deref(), Some("You are helpful."));
    }

    #[test]
    fn accepts_snake_case_keys() {
        let raw = r#"{"avatar_id":"a1","voice_id":"v1","system_prompt":"hi"}"#;
        let request = DispatchRequest::from_metadata(Some(raw)).unwrap();
        assert_eq!(request.avatar_id.as_deref(), Some("a1"));
        assert_eq!(request.voice_id.as_deref(), Some("v1"));
        assert_eq!(request.system_prompt.as_deref(), Some("hi"));
    }

    #[test]
    fn empty_object_and_missing_metadata_are_default() {
        assert_eq!(
            DispatchRequest::from_metadata(Some("{}")).unwrap(),
            DispatchRequest::default()
        );
        assert_eq!(
            DispatchRequest::from_metadata(None).unwrap(),
            DispatchRequest::default()
        );
        assert_eq!(
            DispatchRequest::from_metadata(Some("  ")).unwrap(),
            DispatchRequest::default()
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = r#"{"avatarId":"avatar_456","unknownField":"x","anotherExtra":123}"#;
        let request = DispatchRequest::from_metadata(Some(raw)).unwrap();
        assert_eq!(request.avatar_id.as_deref(), Some("avatar_456"));
        assert!(request.voice_id.is_none());
    }

    #[test]
    fn explicit_nulls_are_absent() {
        let raw = r#"{"voiceId":null,"systemPrompt":""}"#;
        let request = DispatchRequest::from_metadata(Some(raw)).unwrap();
        assert!(request.voice_id.is_none());
        assert_eq!(request.system_prompt.as_deref(), Some(""));
    }

    #[test]
    fn malformed_metadata_is_rejected() {
        assert!(DispatchRequest::from_metadata(Some("not valid json {")).is_err());
        assert!(DispatchRequest::from_metadata(Some(r#"{"voiceId": 42}"#)).is_err());
        assert!(DispatchRequest::from_metadata(Some("[]")).is_err());
    }
}
