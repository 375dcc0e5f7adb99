//! YouTube API error types

use thiserror::Error;

/// YouTube API client errors
#[derive(Error, Debug)]
pub enum YoutubeError {
    /// API key is missing or empty
    #[error("API key is required for YouTube Data API access")]
    MissingApiKey,

    /// Invalid input provided to an API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse YouTube response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The YouTube API returned an error
    #[error("YouTube API error {code}: {message}")]
    Api { code: i32, message: String },

    /// No video exists for the given id
    #[error("Video not found: {0}")]
    VideoNotFound(String),

    /// Request timeout
    #[error("Request to YouTube timed out")]
    Timeout,
}

impl YoutubeError {
    /// Whether this error means the video id itself is unknown, as opposed
    /// to a transport or service problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, YoutubeError::VideoNotFound(_))
    }
}

/// Result type for YouTube operations
pub type YoutubeResult<T> = Result<T, YoutubeError>;
