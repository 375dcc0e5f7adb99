//! WebSocket upgrade handler and per-connection socket loop

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::session::SessionCoordinator;

use super::messages::{ClientMessage, ErrorPayload, ServerMessage};

/// WebSocket upgrade handler for `/ws`
///
/// Assigns the connection a fresh id and hands the socket to
/// [`handle_socket`]. There is no authentication; any viewer may connect
/// and claim master.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(coordinator): Extension<Arc<SessionCoordinator>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, coordinator))
}

/// Drive an established WebSocket connection until either side closes
async fn handle_socket(socket: WebSocket, coordinator: Arc<SessionCoordinator>) {
    let connection_id = Uuid::new_v4();

    // Channel the hub delivers through; this task drains it into the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    coordinator.register_connection(connection_id, tx);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Greet with the assigned id. Queue state is not pushed here: a new
    // viewer catches up by fetching /api/queue/list.
    let greeting = ServerMessage::Connected { connection_id };
    match serde_json::to_string(&greeting) {
        Ok(json) => {
            if ws_sender.send(Message::Text(json)).await.is_err() {
                tracing::warn!(connection_id = %connection_id, "Failed to send greeting");
                coordinator.connection_closed(connection_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize greeting");
            coordinator.connection_closed(connection_id).await;
            return;
        }
    }

    tracing::info!(connection_id = %connection_id, "Viewer connected");

    // Forward hub messages to the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    // Dispatch inbound messages to the coordinator.
    let recv_coordinator = coordinator.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => {
                        handle_client_message(&recv_coordinator, connection_id, msg).await;
                    }
                    Err(e) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %e,
                            "Rejected unparseable client message"
                        );
                        let reply =
                            ServerMessage::Error(ErrorPayload::invalid_message(e.to_string()));
                        let _ = recv_coordinator.connections().send_to(connection_id, reply);
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Handled by axum at the protocol level.
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "WebSocket close received");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first takes the other down with it.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    coordinator.connection_closed(connection_id).await;
    tracing::info!(connection_id = %connection_id, "Viewer disconnected");
}

/// Apply one parsed client message
async fn handle_client_message(
    coordinator: &SessionCoordinator,
    connection_id: Uuid,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::ClaimMaster => {
            coordinator.claim_master(connection_id).await;
        }
        ClientMessage::ReleaseMaster => {
            coordinator.release_master(connection_id).await;
        }
        ClientMessage::Heartbeat => {
            let pong = ServerMessage::Pong {
                server_time: chrono::Utc::now().timestamp_millis(),
            };
            if let Err(e) = coordinator.connections().send_to(connection_id, pong) {
                tracing::debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to send pong"
                );
            }
        }
    }
}
