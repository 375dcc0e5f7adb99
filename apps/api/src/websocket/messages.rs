//! WebSocket message types for the session protocol
//!
//! Messages are serialized as JSON, tagged by a `type` field so the wire
//! format matches the original viewer clients
//! (`{"type":"queueUpdate","queue":[...]}`). Both directions are closed
//! enums: an inbound payload with an unrecognized tag fails to parse and is
//! rejected explicitly rather than ignored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::queue::QueueEntry;

/// Messages sent from a viewer client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Request master playback rights for this connection
    ClaimMaster,

    /// Give up master playback rights, if held
    ReleaseMaster,

    /// Keep-alive; answered with a pong
    Heartbeat,
}

/// Messages sent from the server to viewer clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Greeting carrying the id assigned to this connection
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: Uuid },

    /// Full queue snapshot, broadcast after every mutating intent
    QueueUpdate { queue: Vec<QueueEntry> },

    /// This connection now holds master playback rights
    MasterAccepted,

    /// This connection was displaced as master
    MasterRemoved,

    /// Heartbeat response
    #[serde(rename_all = "camelCase")]
    Pong { server_time: i64 },

    /// Error reply for a rejected inbound message
    Error(ErrorPayload),
}

/// Payload for Error messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::new("INVALID_MESSAGE", message)
    }
}
