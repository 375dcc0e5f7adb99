//! Shared helpers for API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Extension,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;

use watchparty_api::routes::{health_router, queue_router, HealthState, QueueApiState};
use watchparty_api::session::{MetadataFetcher, SessionCoordinator};
use watchparty_api::websocket::ws_handler;
use watchparty_youtube_client::{VideoDetails, YoutubeError};

/// Metadata fetcher stub: resolves every id to deterministic metadata,
/// except ids listed in `fail_ids`, which report video-not-found.
pub struct StubFetcher {
    fail_ids: Vec<String>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            fail_ids: Vec::new(),
        }
    }

    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            fail_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MetadataFetcher for StubFetcher {
    async fn fetch(&self, video_id: &str) -> Result<VideoDetails, YoutubeError> {
        if self.fail_ids.iter().any(|id| id == video_id) {
            return Err(YoutubeError::VideoNotFound(video_id.to_string()));
        }
        Ok(VideoDetails {
            title: format!("title {video_id}"),
            thumbnail: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
        })
    }
}

/// Coordinator backed by the default stub fetcher
pub fn test_coordinator() -> Arc<SessionCoordinator> {
    Arc::new(SessionCoordinator::new(Arc::new(StubFetcher::new())))
}

/// Assemble the app router the way `main` does
pub fn test_app(coordinator: Arc<SessionCoordinator>) -> Router {
    Router::new()
        .route("/", get(|| async { "Watchparty - shared queue session server" }))
        .nest("/health", health_router(HealthState::new(coordinator.clone())))
        .nest(
            "/api/queue",
            queue_router(QueueApiState::new(coordinator.clone())),
        )
        .route("/ws", get(ws_handler))
        .layer(Extension(coordinator))
}

/// Issue a JSON POST and return status plus parsed body
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

/// Issue a bodiless POST and return status plus parsed body
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Issue a GET and return status plus parsed body
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
