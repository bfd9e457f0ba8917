//! Error types for Vesper

use thiserror::Error;

/// Result type alias for Vesper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio capture error (device unavailable or misconfigured)
    #[error("capture error: {0}")]
    Capture(String),

    /// Recording artifact error (cannot create/write/delete backing storage)
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Speech-to-text error
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Language model error
    #[error("inference error: {0}")]
    Inference(String),

    /// Speech synthesis / playback error
    #[error("playback error: {0}")]
    Playback(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
