//! HTTP and WebSocket server.
//!
//! Assembles the shared state and the Axum router, and runs the serve loop.

pub mod http;
pub mod ws;

use crate::config::Config;
use crate::live::{self, LiveHandle};
use crate::polls::PollStore;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Server error
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub store: Arc<PollStore>,
    pub live: LiveHandle,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, store: Arc<PollStore>, live: LiveHandle) -> Self {
        Self {
            config,
            store,
            live,
            start_time: Instant::now(),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(http::health))
        .route("/api/status", get(http::status))
        .route("/api/polls", post(http::create_poll))
        .route("/api/polls/{id}", get(http::get_poll))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let store = Arc::new(PollStore::new());
    let live = live::spawn(Arc::clone(&store));
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;

    let state = Arc::new(AppState::new(config, store, live));
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "quickpoll listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
