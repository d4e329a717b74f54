//! WebSocket surface: the asynchronous join/vote message channel.
//!
//! One task per connection. Inbound frames are translated into hub commands;
//! outbound hub events are serialized onto the socket. Malformed or invalid
//! traffic is dropped without a response; this channel is fire-and-forget,
//! and errors are reported on the REST surface instead.

use super::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outbound frames buffered per connection before fan-out starts dropping.
const SESSION_QUEUE: usize = 64;

/// Messages a viewer may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start watching a poll.
    #[serde(rename_all = "camelCase")]
    Join { poll_id: String },
    /// Cast a vote.
    #[serde(rename_all = "camelCase")]
    Vote {
        poll_id: String,
        option_index: usize,
    },
}

/// Upgrades HTTP to WebSocket at GET /ws.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_connection(socket, state))
}

/// Per-connection loop, alive for the whole socket session.
async fn run_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4().simple().to_string();
    info!(conn_id = %conn_id, "websocket connected");

    let (mut tx, mut rx) = socket.split();
    let (event_tx, mut event_rx) = mpsc::channel(SESSION_QUEUE);
    state.live.connect(conn_id.clone(), event_tx).await;

    loop {
        tokio::select! {
            msg = rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&conn_id, &text, &state).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(conn_id, error = %err, "websocket read failed");
                        break;
                    }
                }
            }

            event = event_rx.recv() => {
                // None means the hub dropped us (shutdown); close the loop.
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(err) => {
                        warn!(conn_id, error = %err, "snapshot serialization failed");
                        continue;
                    }
                };
                if tx.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.live.disconnect(conn_id.clone()).await;
    info!(conn_id, "websocket closed");
}

/// Translate one inbound text frame into a hub command.
async fn handle_text(conn_id: &str, text: &str, state: &Arc<AppState>) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(err) => {
            warn!(conn_id, error = %err, "dropping malformed frame");
            return;
        }
    };

    match msg {
        ClientMessage::Join { poll_id } => {
            state.live.join(conn_id.to_string(), poll_id).await;
        }
        ClientMessage::Vote {
            poll_id,
            option_index,
        } => {
            state.live.vote(poll_id, option_index).await;
        }
    }
}
