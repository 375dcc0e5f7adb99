//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Application environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        })
    }
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment mode (development, staging, production)
    pub environment: Environment,

    /// Server port (default: 3000)
    pub port: u16,

    /// YouTube Data API key for metadata lookups
    pub youtube_api_key: String,

    /// Timeout for a single metadata fetch, in seconds (default: 10)
    pub metadata_timeout_secs: u64,

    /// Maximum number of entries the session queue will hold
    pub max_queue_size: usize,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `YOUTUBE_API_KEY` is always required; without it every add-intent
    /// would fail at the metadata fetch, so the server refuses to start
    /// instead.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        Ok(Self {
            environment,

            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT value")?,

            youtube_api_key: Self::load_youtube_api_key()?,

            metadata_timeout_secs: env::var("METADATA_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid METADATA_TIMEOUT_SECS value")?,

            max_queue_size: env::var("MAX_QUEUE_SIZE")
                .unwrap_or_else(|_| crate::session::queue::MAX_QUEUE_SIZE.to_string())
                .parse()
                .context("Invalid MAX_QUEUE_SIZE value")?,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    fn load_youtube_api_key() -> Result<String> {
        match env::var("YOUTUBE_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => {
                bail!(
                    "YOUTUBE_API_KEY environment variable is required. \
                     Create an API key for the YouTube Data API v3 and set it \
                     (a .env file is loaded if present)."
                );
            }
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
