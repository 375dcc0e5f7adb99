//! WebSocket connection management
//!
//! This module tracks the set of live viewer connections for the session
//! and delivers server messages to them: targeted sends for election
//! outcomes, best-effort broadcast for queue updates.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerMessage;

/// Handle for sending messages to a specific WebSocket connection
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Channel draining into the connection's socket task
    sender: mpsc::UnboundedSender<ServerMessage>,

    /// When this connection was established (Unix timestamp ms)
    pub connected_at: i64,
}

impl ConnectionHandle {
    pub fn new(sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            sender,
            connected_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Send a message to this connection
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender
            .send(msg)
            .map_err(|_| SendError::ConnectionClosed)
    }

    /// Whether the connection's socket task is still draining the channel
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Error type for targeted send operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    ConnectionNotFound,
    ConnectionClosed,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::ConnectionNotFound => write!(f, "connection not found"),
            SendError::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for SendError {}

/// Registry of all live connections in the session
///
/// Thread-safe; uses DashMap for concurrent access without explicit
/// locking and is wrapped in Arc for cheap cloning.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<Uuid, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection
    pub fn register(&self, connection_id: Uuid, sender: mpsc::UnboundedSender<ServerMessage>) {
        self.connections
            .insert(connection_id, ConnectionHandle::new(sender));

        tracing::debug!(
            connection_id = %connection_id,
            connection_count = self.connections.len(),
            "Connection registered"
        );
    }

    /// Remove a connection; returns whether it was present
    pub fn deregister(&self, connection_id: Uuid) -> bool {
        let removed = self.connections.remove(&connection_id).is_some();
        if removed {
            tracing::debug!(
                connection_id = %connection_id,
                connection_count = self.connections.len(),
                "Connection removed"
            );
        }
        removed
    }

    pub fn contains(&self, connection_id: Uuid) -> bool {
        self.connections.contains_key(&connection_id)
    }

    /// Number of tracked connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send a message to one specific connection
    pub fn send_to(&self, connection_id: Uuid, msg: ServerMessage) -> Result<(), SendError> {
        let handle = self
            .connections
            .get(&connection_id)
            .ok_or(SendError::ConnectionNotFound)?;
        handle.send(msg)
    }

    /// Send a message to every open connection, best effort.
    ///
    /// A connection found closed at delivery time is skipped without
    /// aborting delivery to the rest, and its dead handle is pruned.
    /// Returns the number of connections the message was delivered to.
    pub fn broadcast(&self, msg: ServerMessage) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for entry in self.connections.iter() {
            if !entry.value().is_open() {
                dead.push(*entry.key());
                continue;
            }
            match entry.value().send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => dead.push(*entry.key()),
            }
        }

        for connection_id in dead {
            if self.connections.remove(&connection_id).is_some() {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Pruned closed connection during broadcast"
                );
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_deregister() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();

        let (tx, _rx) = mpsc::unbounded_channel();
        registry.register(id, tx);

        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        assert!(registry.deregister(id));
        assert!(!registry.contains(id));
        assert!(registry.is_empty());

        // Second deregister is a no-op
        assert!(!registry.deregister(id));
    }

    #[test]
    fn test_send_to_unknown_connection() {
        let registry = ConnectionRegistry::new();
        let result = registry.send_to(Uuid::new_v4(), ServerMessage::MasterAccepted);
        assert_eq!(result, Err(SendError::ConnectionNotFound));
    }

    #[test]
    fn test_send_to_closed_connection() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();

        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(id, tx);
        drop(rx);

        let result = registry.send_to(id, ServerMessage::MasterAccepted);
        assert_eq!(result, Err(SendError::ConnectionClosed));
    }

    #[test]
    fn test_broadcast_reaches_all_open_connections() {
        let registry = ConnectionRegistry::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.register(Uuid::new_v4(), tx1);
        registry.register(Uuid::new_v4(), tx2);

        let delivered = registry.broadcast(ServerMessage::QueueUpdate { queue: vec![] });

        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_broadcast_skips_and_prunes_closed_connections() {
        let registry = ConnectionRegistry::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();

        registry.register(Uuid::new_v4(), tx1);
        registry.register(Uuid::new_v4(), tx2);
        registry.register(Uuid::new_v4(), tx3);
        registry.register(Uuid::new_v4(), tx_closed);
        drop(rx_closed);

        let delivered = registry.broadcast(ServerMessage::QueueUpdate { queue: vec![] });

        assert_eq!(delivered, 3);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
        assert!(rx3.try_recv().is_ok());

        // The dead handle was pruned, not just skipped.
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_broadcast_to_empty_registry() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.broadcast(ServerMessage::MasterRemoved), 0);
    }
}
