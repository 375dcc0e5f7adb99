//! YouTube Data API client for Watchparty
//!
//! This crate provides the two external collaborators the session core
//! depends on:
//! - identifier resolution: extracting a canonical video id from a raw
//!   string (bare id or URL form), a pure function with no I/O
//! - metadata lookup: fetching title and thumbnail for a video id from
//!   the YouTube Data API v3
//!
//! # Example
//!
//! ```rust,no_run
//! use watchparty_youtube_client::{parse_video_id, YoutubeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let video_id = parse_video_id("https://youtu.be/dQw4w9WgXcQ")
//!     .ok_or("not a video reference")?;
//!
//! let client = YoutubeClient::new("your_api_key")?;
//! let details = client.video_details(&video_id).await?;
//! println!("{}: {}", details.title, details.thumbnail);
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `YOUTUBE_API_KEY`: API key for the YouTube Data API (required)

mod client;
mod error;
mod id;
mod models;

pub use client::YoutubeClient;
pub use error::{YoutubeError, YoutubeResult};
pub use id::parse_video_id;
pub use models::VideoDetails;
