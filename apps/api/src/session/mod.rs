//! Session coordination core
//!
//! A single shared watching session: one queue, one master election, one
//! set of viewer connections. The [`SessionCoordinator`] is the only owner
//! of queue and election state: every mutating intent runs to completion,
//! including its resulting broadcast, under the write lock before the next
//! one is applied, which is what preserves the queue ordering invariant.
//! Read intents take the read lock and interleave freely.

pub mod master;
pub mod queue;

pub use master::{ClaimOutcome, MasterElection};
pub use queue::{QueueEntry, QueueError, QueueStore, VoteDelta};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use watchparty_youtube_client::{parse_video_id, VideoDetails, YoutubeClient, YoutubeError};

use crate::websocket::connection::ConnectionRegistry;
use crate::websocket::messages::ServerMessage;

/// Seam for the external metadata lookup, so tests can run the coordinator
/// against a stub instead of the real YouTube API.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<VideoDetails, YoutubeError>;
}

#[async_trait]
impl MetadataFetcher for YoutubeClient {
    async fn fetch(&self, video_id: &str) -> Result<VideoDetails, YoutubeError> {
        self.video_details(video_id).await
    }
}

/// Errors surfaced to the caller of a session intent
#[derive(Debug, Error)]
pub enum IntentError {
    /// The raw input does not parse to a usable video id; the add aborts
    /// before any metadata fetch or mutation.
    #[error("could not resolve a video id from {0:?}")]
    IdentifierUnresolved(String),

    /// The external metadata fetch failed; the add aborts with no mutation.
    #[error(transparent)]
    Metadata(#[from] YoutubeError),

    /// A queue operation was rejected.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

#[derive(Debug, Default)]
struct SessionState {
    queue: QueueStore,
    election: MasterElection,
}

/// The façade coordinating queue, election and notifications
pub struct SessionCoordinator {
    state: RwLock<SessionState>,
    connections: ConnectionRegistry,
    fetcher: Arc<dyn MetadataFetcher>,
}

impl SessionCoordinator {
    pub fn new(fetcher: Arc<dyn MetadataFetcher>) -> Self {
        Self::with_queue_capacity(fetcher, queue::MAX_QUEUE_SIZE)
    }

    pub fn with_queue_capacity(fetcher: Arc<dyn MetadataFetcher>, max_queue_size: usize) -> Self {
        Self {
            state: RwLock::new(SessionState {
                queue: QueueStore::with_capacity(max_queue_size),
                election: MasterElection::new(),
            }),
            connections: ConnectionRegistry::new(),
            fetcher,
        }
    }

    /// The live connection registry (for the WebSocket layer and probes)
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Resolve, fetch metadata for, and enqueue a raw video reference.
    ///
    /// A duplicate submission is a no-op: the unchanged snapshot comes
    /// back and nothing is broadcast. The metadata fetch runs before the
    /// write lock is taken, so a slow fetch never blocks other intents;
    /// the queue is re-checked for duplicates after the fetch in case a
    /// concurrent add won the race.
    pub async fn add_to_queue(&self, raw_input: &str) -> Result<Vec<QueueEntry>, IntentError> {
        let video_id = parse_video_id(raw_input)
            .ok_or_else(|| IntentError::IdentifierUnresolved(raw_input.to_string()))?;

        {
            let state = self.state.read().await;
            if state.queue.contains(&video_id) {
                tracing::debug!(video_id = %video_id, "Duplicate add ignored");
                return Ok(state.queue.snapshot());
            }
        }

        let details = self.fetcher.fetch(&video_id).await?;

        let mut state = self.state.write().await;
        match state
            .queue
            .add(video_id.as_str(), details.title, details.thumbnail)
        {
            Ok(()) => {
                tracing::info!(
                    video_id = %video_id,
                    queue_len = state.queue.len(),
                    "Video added to queue"
                );
                Ok(self.broadcast_snapshot(&state))
            }
            Err(QueueError::Duplicate(_)) => {
                tracing::debug!(video_id = %video_id, "Duplicate add ignored");
                Ok(state.queue.snapshot())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the entry at `index`
    pub async fn remove_at(&self, index: usize) -> Result<Vec<QueueEntry>, IntentError> {
        let mut state = self.state.write().await;
        let removed = state.queue.remove_at(index)?;
        tracing::info!(video_id = %removed.video_id, index, "Entry removed from queue");
        Ok(self.broadcast_snapshot(&state))
    }

    /// Advance past the finished entry at index 0
    pub async fn advance_played(&self) -> Result<Vec<QueueEntry>, IntentError> {
        self.remove_at(0).await
    }

    /// Apply a vote to the entry at `index` and re-settle its position
    pub async fn vote(
        &self,
        index: usize,
        delta: VoteDelta,
    ) -> Result<Vec<QueueEntry>, IntentError> {
        let mut state = self.state.write().await;
        state.queue.vote(index, delta)?;
        Ok(self.broadcast_snapshot(&state))
    }

    /// The entry currently playing, if any
    pub async fn current(&self) -> Option<QueueEntry> {
        self.state.read().await.queue.current().cloned()
    }

    /// Immutable snapshot of the full queue
    pub async fn list(&self) -> Vec<QueueEntry> {
        self.state.read().await.queue.snapshot()
    }

    /// Register a viewer connection with the notification hub
    pub fn register_connection(
        &self,
        connection_id: Uuid,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) {
        self.connections.register(connection_id, sender);
    }

    /// Grant master playback rights to `connection_id`.
    ///
    /// The displaced holder, if any, gets exactly one `masterRemoved`; the
    /// new holder gets exactly one `masterAccepted`. Election outcomes are
    /// targeted, never broadcast.
    pub async fn claim_master(&self, connection_id: Uuid) -> ClaimOutcome {
        let mut state = self.state.write().await;
        let outcome = state.election.claim(connection_id);

        if let Some(revoked) = outcome.revoked {
            if let Err(e) = self.connections.send_to(revoked, ServerMessage::MasterRemoved) {
                tracing::debug!(
                    connection_id = %revoked,
                    error = %e,
                    "Failed to notify displaced master"
                );
            }
        }
        if let Err(e) = self
            .connections
            .send_to(connection_id, ServerMessage::MasterAccepted)
        {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Failed to notify new master"
            );
        }

        tracing::info!(
            connection_id = %connection_id,
            revoked = ?outcome.revoked,
            "Master playback claimed"
        );
        outcome
    }

    /// Release master rights if `connection_id` holds them
    pub async fn release_master(&self, connection_id: Uuid) {
        let mut state = self.state.write().await;
        state.election.release(connection_id);
    }

    /// The connection currently holding master rights
    pub async fn master_holder(&self) -> Option<Uuid> {
        self.state.read().await.election.holder()
    }

    /// Tear down a closed viewer connection.
    ///
    /// Removes it from the hub and auto-releases the master slot if this
    /// connection held it, so the register can never point at a dead peer.
    pub async fn connection_closed(&self, connection_id: Uuid) {
        self.connections.deregister(connection_id);

        let mut state = self.state.write().await;
        if state.election.holder() == Some(connection_id) {
            state.election.release(connection_id);
            tracing::info!(
                connection_id = %connection_id,
                "Master released on disconnect"
            );
        }
    }

    /// Broadcast the current snapshot to all viewers and return it.
    /// Called with the write lock held so the mutation and its broadcast
    /// are atomic with respect to other mutations.
    fn broadcast_snapshot(&self, state: &SessionState) -> Vec<QueueEntry> {
        let snapshot = state.queue.snapshot();
        let delivered = self.connections.broadcast(ServerMessage::QueueUpdate {
            queue: snapshot.clone(),
        });
        tracing::debug!(
            delivered,
            queue_len = snapshot.len(),
            "Queue update broadcast"
        );
        snapshot
    }
}
