//! Generation Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("invalid audioContent base64: {0}")]
    InvalidAudioEncoding(String),

    #[error("audioContent is empty after base64 decode")]
    EmptyAudio,
}
