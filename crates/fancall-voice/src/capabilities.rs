use crate::avatar::HedraAvatar;
use crate::llm::OpenAiLlm;
use crate::tts::FishAudioTts;

/// Everything an agent session is started with.
///
/// Built in full before the room is touched; a session never starts with a
/// partial set.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub llm: OpenAiLlm,
    pub tts: FishAudioTts,
    pub avatar: Option<HedraAvatar>,
    /// Composed agent instructions (system prompt plus guidelines).
    pub instructions: String,
}
