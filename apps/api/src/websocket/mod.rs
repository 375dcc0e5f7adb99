//! WebSocket layer: live viewer connections and the session protocol
//!
//! This module owns:
//! - the connection registry (the notification hub fanning out queue
//!   updates and delivering targeted election outcomes)
//! - the tagged JSON message protocol
//! - the `/ws` upgrade handler and per-socket loop

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::{ConnectionRegistry, SendError};
pub use handler::ws_handler;
pub use messages::{ClientMessage, ErrorPayload, ServerMessage};
