//! Error types for yt-focus

use thiserror::Error;

/// Stable error codes, independent of the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Ingestion errors
    ConfigurationError,
    InvalidUrl,
    ProviderError,
    NetworkError,

    // Player errors
    IndexOutOfRange,
    UnsupportedValue,

    // User errors
    UnknownTask,
    InvalidCommand,

    // System errors
    FileError,
    ParseError,
}

/// Main error type for yt-focus
#[derive(Error, Debug)]
pub enum YtFocusError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid playlist URL: {0}")]
    InvalidUrl(String),

    #[error("YouTube API error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Video index {index} is out of range (playlist has {len} videos)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unsupported playback rate: {0}")]
    UnsupportedPlaybackRate(String),

    #[error("Unsupported quality level: {0}")]
    UnsupportedQuality(String),

    #[error("No task with id {0}")]
    UnknownTask(u64),

    #[error("{0}")]
    InvalidCommand(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl YtFocusError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::ConfigurationError,
            Self::InvalidUrl(_) => ErrorCode::InvalidUrl,
            Self::Provider(_) => ErrorCode::ProviderError,
            Self::Network(_) => ErrorCode::NetworkError,
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::UnsupportedPlaybackRate(_) => ErrorCode::UnsupportedValue,
            Self::UnsupportedQuality(_) => ErrorCode::UnsupportedValue,
            Self::UnknownTask(_) => ErrorCode::UnknownTask,
            Self::InvalidCommand(_) => ErrorCode::InvalidCommand,
            Self::File(_) => ErrorCode::FileError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Json(_) => ErrorCode::ParseError,
        }
    }
}

pub type Result<T> = std::result::Result<T, YtFocusError>;
