//! HTTP route handlers for the Watchparty API
//!
//! This module contains the REST endpoint handlers:
//! - Queue intents (add, remove, vote, advance, current, list)
//! - Health check and status endpoints

pub mod health;
pub mod queue;

pub use health::{health_router, HealthState};
pub use queue::{queue_router, QueueApiState};
