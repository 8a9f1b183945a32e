use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit API error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Room service error: {0}")]
    RoomService(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure to turn an avatar image reference into a decoded image.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("invalid encoded image: {0}")]
    InvalidEncodedImage(String),

    #[error("image fetch failed: {message}")]
    FetchFailed {
        /// HTTP status when the server answered, `None` for transport faults.
        status: Option<u16>,
        message: String,
    },

    #[error("image exceeds maximum size: {size} bytes (limit: {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image reference: {0}")]
    UnsupportedReference(String),
}
