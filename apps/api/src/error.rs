//! Error handling for the Watchparty API
//!
//! A unified error type using thiserror, with HTTP status code mapping via
//! Axum's IntoResponse trait. Every rejected intent surfaces here with a
//! stable machine-readable code; nothing in this module is fatal to the
//! process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::session::{IntentError, QueueError};
use watchparty_youtube_client::YoutubeError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Raw input did not resolve to a canonical video id
    #[error("could not resolve a video id from {0:?}")]
    IdentifierUnresolved(String),

    /// No video exists for a resolved id
    #[error("video not found: {0}")]
    VideoNotFound(String),

    /// The external metadata lookup failed
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// A remove or vote referenced a nonexistent position
    #[error("index {index} is out of bounds for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The queue is at capacity
    #[error("queue is at capacity ({0} entries)")]
    QueueFull(usize),

    /// A video id was submitted that is already queued
    #[error("video already queued: {0}")]
    DuplicateEntry(String),

    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::IdentifierUnresolved(_)
            | Self::IndexOutOfRange { .. }
            | Self::QueueFull(_)
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            Self::VideoNotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::DuplicateEntry(_) => StatusCode::CONFLICT,

            // 502 Bad Gateway (external service errors)
            Self::MetadataUnavailable(_) => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IdentifierUnresolved(_) => "IDENTIFIER_UNRESOLVED",
            Self::VideoNotFound(_) => "VIDEO_NOT_FOUND",
            Self::MetadataUnavailable(_) => "METADATA_UNAVAILABLE",
            Self::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Self::QueueFull(_) => "QUEUE_FULL",
            Self::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with severity matched to the status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Duplicate(id) => Self::DuplicateEntry(id),
            QueueError::IndexOutOfRange { index, len } => Self::IndexOutOfRange { index, len },
            QueueError::Full(max) => Self::QueueFull(max),
        }
    }
}

impl From<YoutubeError> for ApiError {
    fn from(err: YoutubeError) -> Self {
        match err {
            YoutubeError::VideoNotFound(id) => Self::VideoNotFound(id),
            YoutubeError::InvalidInput(msg) => Self::ValidationError(msg),
            other => Self::MetadataUnavailable(other.to_string()),
        }
    }
}

impl From<IntentError> for ApiError {
    fn from(err: IntentError) -> Self {
        match err {
            IntentError::IdentifierUnresolved(raw) => Self::IdentifierUnresolved(raw),
            IntentError::Metadata(e) => e.into(),
            IntentError::Queue(e) => e.into(),
        }
    }
}
