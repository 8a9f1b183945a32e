//! Dispatch configuration resolution.
//!
//! Each persona field is taken from the first layer that has it: the
//! dispatch request, then the deployment environment, then the persona
//! configured at startup. An empty string is a value, not an absence.

use fancall_types::{AgentPersona, DispatchRequest};

/// Layer a resolved value was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Request,
    Deployment,
    Persona,
}

impl ValueSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Deployment => "deployment",
            Self::Persona => "persona",
        }
    }
}

/// A value together with the single layer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: ValueSource,
}

/// Request fields merged with deployment and persona defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub avatar_id: Option<Resolved>,
    pub profile_picture_url: Option<Resolved>,
    pub idle_video_url: Option<Resolved>,
    pub voice_id: Option<Resolved>,
    pub system_prompt: Option<Resolved>,
}

impl ResolvedConfig {
    pub fn avatar_id(&self) -> Option<&str> {
        self.avatar_id.as_ref().map(|r| r.value.as_str())
    }

    pub fn profile_picture_url(&self) -> Option<&str> {
        self.profile_picture_url.as_ref().map(|r| r.value.as_str())
    }

    pub fn idle_video_url(&self) -> Option<&str> {
        self.idle_video_url.as_ref().map(|r| r.value.as_str())
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_ref().map(|r| r.value.as_str())
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_ref().map(|r| r.value.as_str())
    }
}

/// Resolves every persona field for one dispatch.
pub fn resolve(
    request: &DispatchRequest,
    deployment: &AgentPersona,
    persona: &AgentPersona,
) -> ResolvedConfig {
    ResolvedConfig {
        avatar_id: pick([
            &request.avatar_id,
            &deployment.avatar_id,
            &persona.avatar_id,
        ]),
        profile_picture_url: pick([
            &request.profile_picture_url,
            &deployment.profile_picture_url,
            &persona.profile_picture_url,
        ]),
        idle_video_url: pick([
            &request.idle_video_url,
            &deployment.idle_video_url,
            &persona.idle_video_url,
        ]),
        voice_id: pick([&request.voice_id, &deployment.voice_id, &persona.voice_id]),
        system_prompt: pick([
            &request.system_prompt,
            &deployment.system_prompt,
            &persona.system_prompt,
        ]),
    }
}

/// First present value in request, deployment, persona order.
fn pick(layers: [&Option<String>; 3]) -> Option<Resolved> {
    layers
        .into_iter()
        .zip([
            ValueSource::Request,
            ValueSource::Deployment,
            ValueSource::Persona,
        ])
        .find_map(|(value, source)| {
            value.as_ref().map(|v| Resolved {
                value: v.clone(),
                source,
            })
        })
}
