//! Queue HTTP route handlers
//!
//! REST surface for the session queue, mounted under `/api/queue`. Every
//! mutating endpoint returns the updated queue snapshot; the broadcast to
//! WebSocket viewers is triggered by the coordinator as part of the
//! mutation itself.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::session::{QueueEntry, SessionCoordinator, VoteDelta};

/// Shared state for queue route handlers
#[derive(Clone)]
pub struct QueueApiState {
    pub coordinator: Arc<SessionCoordinator>,
}

impl QueueApiState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self { coordinator }
    }
}

/// Create the queue router
pub fn queue_router(state: QueueApiState) -> Router {
    Router::new()
        .route("/add", post(add))
        .route("/remove", post(remove))
        .route("/removePlayed", post(remove_played))
        .route("/vote", post(vote))
        .route("/current", get(current))
        .route("/list", get(list))
        .with_state(state)
}

/// Body for `POST /api/queue/add`; `videoId` may be a bare id or any
/// recognizable YouTube URL form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest {
    video_id: String,
}

async fn add(
    State(state): State<QueueApiState>,
    Json(req): Json<AddRequest>,
) -> ApiResult<Json<Vec<QueueEntry>>> {
    let snapshot = state.coordinator.add_to_queue(&req.video_id).await?;
    Ok(Json(snapshot))
}

/// Body for `POST /api/queue/remove`
#[derive(Debug, Deserialize)]
struct RemoveRequest {
    index: usize,
}

async fn remove(
    State(state): State<QueueApiState>,
    Json(req): Json<RemoveRequest>,
) -> ApiResult<Json<Vec<QueueEntry>>> {
    let snapshot = state.coordinator.remove_at(req.index).await?;
    Ok(Json(snapshot))
}

async fn remove_played(
    State(state): State<QueueApiState>,
) -> ApiResult<Json<Vec<QueueEntry>>> {
    let snapshot = state.coordinator.advance_played().await?;
    Ok(Json(snapshot))
}

/// Body for `POST /api/queue/vote`; field names match the original
/// viewer clients (`id` is the entry index, `voteValue` is +1 or -1).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    id: usize,
    vote_value: i32,
}

async fn vote(
    State(state): State<QueueApiState>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<Vec<QueueEntry>>> {
    let delta = VoteDelta::from_value(req.vote_value).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "voteValue must be +1 or -1, got {}",
            req.vote_value
        ))
    })?;

    let snapshot = state.coordinator.vote(req.id, delta).await?;
    Ok(Json(snapshot))
}

async fn current(State(state): State<QueueApiState>) -> Json<Option<QueueEntry>> {
    Json(state.coordinator.current().await)
}

async fn list(State(state): State<QueueApiState>) -> Json<Vec<QueueEntry>> {
    Json(state.coordinator.list().await)
}
