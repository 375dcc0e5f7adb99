//! Integration tests crossing the REST and notification layers
//!
//! Viewers are simulated by registering channels with the coordinator the
//! way the WebSocket layer does, then driving mutations through the REST
//! router and asserting on the fan-out.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use common::{post_json, test_app, test_coordinator};
use watchparty_api::websocket::ServerMessage;

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

#[tokio::test]
async fn test_rest_add_broadcasts_to_all_viewers() {
    let coordinator = test_coordinator();
    let app = test_app(coordinator.clone());

    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    coordinator.register_connection(Uuid::new_v4(), tx1);
    coordinator.register_connection(Uuid::new_v4(), tx2);

    let (status, _) = post_json(&app, "/api/queue/add", json!({"videoId": "dQw4w9WgXcQ"})).await;
    assert_eq!(status, StatusCode::OK);

    for rx in [&mut rx1, &mut rx2] {
        let messages = drain(rx);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ServerMessage::QueueUpdate { queue } => {
                assert_eq!(queue.len(), 1);
                assert_eq!(queue[0].video_id, "dQw4w9WgXcQ");
            }
            other => panic!("expected queueUpdate, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_broadcast_skips_closed_viewer() {
    let coordinator = test_coordinator();
    let app = test_app(coordinator.clone());

    let (tx_open, mut rx_open) = mpsc::unbounded_channel();
    let (tx_closed, rx_closed) = mpsc::unbounded_channel();
    coordinator.register_connection(Uuid::new_v4(), tx_open);
    coordinator.register_connection(Uuid::new_v4(), tx_closed);
    drop(rx_closed);

    let (status, _) = post_json(&app, "/api/queue/add", json!({"videoId": "dQw4w9WgXcQ"})).await;
    assert_eq!(status, StatusCode::OK);

    // The open viewer still gets its update.
    assert_eq!(drain(&mut rx_open).len(), 1);
}

#[tokio::test]
async fn test_failed_intent_does_not_broadcast() {
    let coordinator = test_coordinator();
    let app = test_app(coordinator.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    coordinator.register_connection(Uuid::new_v4(), tx);

    let (status, _) = post_json(&app, "/api/queue/remove", json!({"index": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_every_mutating_intent_broadcasts_once() {
    let coordinator = test_coordinator();
    let app = test_app(coordinator.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    coordinator.register_connection(Uuid::new_v4(), tx);

    post_json(&app, "/api/queue/add", json!({"videoId": "aaaaaaaaaaa"})).await;
    post_json(&app, "/api/queue/add", json!({"videoId": "bbbbbbbbbbb"})).await;
    post_json(&app, "/api/queue/vote", json!({"id": 1, "voteValue": 1})).await;
    post_json(&app, "/api/queue/remove", json!({"index": 1})).await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 4);
    assert!(messages
        .iter()
        .all(|m| matches!(m, ServerMessage::QueueUpdate { .. })));
}

#[tokio::test]
async fn test_read_intents_do_not_broadcast() {
    let coordinator = test_coordinator();
    let app = test_app(coordinator.clone());

    post_json(&app, "/api/queue/add", json!({"videoId": "aaaaaaaaaaa"})).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    coordinator.register_connection(Uuid::new_v4(), tx);

    common::get_json(&app, "/api/queue/list").await;
    common::get_json(&app, "/api/queue/current").await;

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_election_flow_with_viewers() {
    let coordinator = test_coordinator();

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    coordinator.register_connection(a, tx_a);
    coordinator.register_connection(b, tx_b);

    coordinator.claim_master(a).await;
    coordinator.claim_master(b).await;

    assert_eq!(
        drain(&mut rx_a),
        vec![ServerMessage::MasterAccepted, ServerMessage::MasterRemoved]
    );
    assert_eq!(drain(&mut rx_b), vec![ServerMessage::MasterAccepted]);

    // Master disconnect frees the slot for the next claimer.
    coordinator.connection_closed(b).await;
    assert_eq!(coordinator.master_holder().await, None);
}
