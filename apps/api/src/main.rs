use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchparty_api::config::Config;
use watchparty_api::routes::{health_router, queue_router, HealthState, QueueApiState};
use watchparty_api::session::SessionCoordinator;
use watchparty_api::websocket::ws_handler;
use watchparty_youtube_client::YoutubeClient;

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    let is_production = config.is_production();

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchparty_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment,
        "Starting Watchparty API server on port {}",
        config.port
    );

    // Metadata fetcher for add-intents; the timeout bounds the only
    // suspending external call in the session core.
    let youtube_client = YoutubeClient::with_timeout(
        config.youtube_api_key.clone(),
        Duration::from_secs(config.metadata_timeout_secs),
    )?;
    tracing::info!("YouTube client initialized");

    // The session core: one queue, one election, one connection set,
    // constructed once and shared by every handler.
    let coordinator = Arc::new(SessionCoordinator::with_queue_capacity(
        Arc::new(youtube_client),
        config.max_queue_size,
    ));
    tracing::info!(max_queue_size = config.max_queue_size, "Session coordinator initialized");

    let health_state = HealthState::new(coordinator.clone());
    let queue_state = QueueApiState::new(coordinator.clone());

    let cors_layer = build_cors_layer(&config);

    // Build the router
    let app = Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(health_state))
        // Queue intents: /api/queue/add, /remove, /removePlayed, /vote, /current, /list
        .nest("/api/queue", queue_router(queue_state))
        // Viewer WebSocket channel
        .route("/ws", get(ws_handler))
        .layer(Extension(coordinator))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> &'static str {
    "Watchparty - shared queue session server"
}
