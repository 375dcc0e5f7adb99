//! YouTube Data API response models

use serde::{Deserialize, Serialize};

/// Display metadata for a single video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetails {
    /// Video title
    pub title: String,
    /// URL of the best available thumbnail
    pub thumbnail: String,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    pub title: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Thumbnails {
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Pick the best available resolution
    pub fn best(self) -> Option<Thumbnail> {
        self.high.or(self.medium).or(self.default)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

/// YouTube API error response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: i32,
    pub message: String,
}
