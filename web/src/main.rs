//! Memory Scramble Web Server
//!
//! Minimal HTTP server exposing one shared game board.
//! Endpoints:
//! - GET  /health                    - Health check
//! - GET  /look/:player              - Board from the player's perspective
//! - GET  /flip/:player/:spot        - Flip the card at "row,col" (may long-poll)
//! - GET  /replace/:player/:from/:to - Rename every card labeled `from` to `to`
//! - GET  /watch/:player             - Long-poll until the board changes
//!
//! Game responses are plain text in the snapshot grammar; errors carry a
//! text body naming the rule that denied the operation.

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use anyhow::Context;
use scramble_core::Board;

mod handlers;
mod types;

use handlers::{flip, health, look, replace, watch};

/// Shared application state
pub struct AppState {
    /// The one board every request plays on
    pub board: Board,
}

/// Create the application router with the given state.
/// This is separated out for testing purposes.
pub fn create_app(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/look/:player", get(look))
        .route("/flip/:player/:spot", get(flip))
        .route("/replace/:player/:from/:to", get(replace))
        .route("/watch/:player", get(watch))
        .layer(build_cors(allowed_origins))
        .with_state(state)
}

/// CORS layer from the configured origin list. An empty list allows every
/// origin, which is fine for development but worth a warning.
fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        warn!("CORS: allowing all origins (development mode)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create application state for testing (fixed board, no config).
#[cfg(test)]
pub fn create_test_state() -> Arc<AppState> {
    let board =
        Board::parse("3x3\nu\nu\na\nb\nb\nc\nc\na\nx\n").expect("test board should parse");
    Arc::new(AppState { board })
}

/// Creates a future that completes when a shutdown signal is received.
/// Handles Ctrl+C on all platforms.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received, stopping server...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration from config.toml with env var overrides
    let config = scramble_config::load_config();
    info!(
        board_file = %config.common.board_file,
        "Configuration loaded"
    );

    // Parse the board exactly once, before any concurrent access begins.
    let text = tokio::fs::read_to_string(&config.common.board_file)
        .await
        .with_context(|| format!("failed to read board file {}", config.common.board_file))?;
    let board = Board::parse(&text)
        .with_context(|| format!("invalid board file {}", config.common.board_file))?;
    info!(rows = board.rows(), cols = board.cols(), "Board dealt");

    let state = Arc::new(AppState { board });
    let app = create_app(state, &config.web.allowed_origins);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

// ============================================================================
// Integration Tests
// ============================================================================
