//! Voice and avatar capabilities for the Fancall companion agent.
//!
//! Wraps the external services a companion session is built from: the
//! OpenAI chat model, Fish Audio speech synthesis, and the optional Hedra
//! avatar. The services themselves are black boxes; this crate owns their
//! construction, the avatar image acquisition that feeds Hedra, and the
//! LiveKit room the session runs in.

pub mod acquire;
pub mod avatar;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod llm;
pub mod room;
pub mod tts;

pub use acquire::{
    decode_data_url, decode_image_bytes, HttpImageAcquirer, ImageAcquirer,
    DEFAULT_FETCH_TIMEOUT, MAX_IMAGE_BYTES,
};
pub use avatar::{AvatarSource, HedraAvatar};
pub use capabilities::Capabilities;
pub use config::LiveKitConfig;
pub use error::{AcquisitionError, VoiceError};
pub use llm::{OpenAiLlm, DEFAULT_LLM_MODEL};
pub use room::{generate_agent_token, LiveKitRoom, Room};
pub use tts::FishAudioTts;
