//! YouTube Data API client implementation

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{YoutubeError, YoutubeResult};
use crate::id::parse_video_id;
use crate::models::{ErrorResponse, VideoDetails, VideoListResponse};

/// YouTube Data API v3 videos endpoint
const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// YouTube Data API client
///
/// Failures surface immediately: requests carry a timeout but are never
/// retried, so a transient outage shows up as a single failed lookup.
#[derive(Clone)]
pub struct YoutubeClient {
    http_client: Client,
    api_key: String,
    api_url: String,
}

impl fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl YoutubeClient {
    /// Create a new YouTube client with the given API key
    ///
    /// # Errors
    /// Returns `YoutubeError::MissingApiKey` if the API key is empty
    pub fn new(api_key: impl Into<String>) -> YoutubeResult<Self> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new YouTube client with an explicit request timeout
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> YoutubeResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(YoutubeError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent("Watchparty/1.0")
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: YOUTUBE_API_URL.to_string(),
        })
    }

    /// Create a YouTube client from the `YOUTUBE_API_KEY` environment variable
    pub fn from_env() -> YoutubeResult<Self> {
        match std::env::var("YOUTUBE_API_KEY") {
            Ok(key) if key.is_empty() => Err(YoutubeError::MissingApiKey),
            Ok(key) => Self::new(key),
            Err(std::env::VarError::NotPresent) => Err(YoutubeError::MissingApiKey),
            Err(std::env::VarError::NotUnicode(_)) => Err(YoutubeError::InvalidInput(
                "YOUTUBE_API_KEY contains invalid UTF-8".to_string(),
            )),
        }
    }

    /// Override the API base URL (used by tests against a mock server)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Fetch display metadata for a single video id
    ///
    /// # Errors
    /// - `YoutubeError::InvalidInput` - if the id is not a canonical video id
    /// - `YoutubeError::VideoNotFound` - if no video exists for the id
    /// - `YoutubeError::Api` - if YouTube returns an error envelope
    /// - `YoutubeError::Timeout` / `YoutubeError::Http` - transport failures
    pub async fn video_details(&self, video_id: &str) -> YoutubeResult<VideoDetails> {
        if parse_video_id(video_id).as_deref() != Some(video_id) {
            return Err(YoutubeError::InvalidInput(format!(
                "not a canonical video id: {video_id}"
            )));
        }

        debug!(video_id = %video_id, "Fetching video details from YouTube");

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    YoutubeError::Timeout
                } else {
                    YoutubeError::Http(e)
                }
            })?;

        let text = response.text().await.map_err(YoutubeError::Http)?;

        // YouTube reports quota and key problems in an error envelope
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&text) {
            warn!(
                video_id = %video_id,
                code = error.error.code,
                "YouTube API returned an error"
            );
            return Err(YoutubeError::Api {
                code: error.error.code,
                message: error.error.message,
            });
        }

        let list: VideoListResponse = serde_json::from_str(&text)?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YoutubeError::VideoNotFound(video_id.to_string()))?;

        let thumbnail = item
            .snippet
            .thumbnails
            .best()
            .map(|t| t.url)
            .unwrap_or_default();

        debug!(video_id = %video_id, title = %item.snippet.title, "Video details resolved");

        Ok(VideoDetails {
            title: item.snippet.title,
            thumbnail,
        })
    }
}
