//! Error types for the effect core.

use thiserror::Error;

/// Effect core errors
#[derive(Error, Debug)]
pub enum FxError {
    /// A hand record that cannot be classified this frame.
    #[error("malformed landmarks: {0}")]
    MalformedLandmarks(String),

    /// Configuration file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The hand-tracking provider (or its camera) could not be started.
    /// Fatal to the session; there is no automatic retry.
    #[error("hand tracking unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Result type for effect core operations
pub type Result<T> = std::result::Result<T, FxError>;
