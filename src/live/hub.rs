//! Realtime fan-out hub.
//!
//! All room membership changes and vote mutations flow through one task fed
//! by a single command queue, so snapshots of a given poll reach every
//! subscriber in exactly the order the votes were applied, and a join's
//! initial snapshot is ordered correctly against votes on either side of it.
//!
//! Connections register an outbound queue on connect; delivery is `try_send`,
//! fire-and-forget. A viewer with a full queue misses a frame and catches up
//! on the next one; it never blocks the hub.

use crate::polls::{Poll, PollStore};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

const COMMAND_QUEUE: usize = 256;

/// Frames pushed from the hub to a single connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Current snapshot, sent once right after a successful join.
    Poll { poll: Poll },
    /// Fresh snapshot, fanned out to a room after a vote lands.
    Update { poll: Poll },
}

impl ServerEvent {
    pub fn poll(&self) -> &Poll {
        match self {
            ServerEvent::Poll { poll } | ServerEvent::Update { poll } => poll,
        }
    }
}

/// Counters for the status surface.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LiveStats {
    /// Registered connections
    pub connections: usize,
    /// Rooms with at least one member
    pub rooms: usize,
}

#[derive(Debug)]
enum Command {
    Connect {
        conn_id: String,
        sender: mpsc::Sender<ServerEvent>,
    },
    Join {
        conn_id: String,
        poll_id: String,
    },
    Vote {
        poll_id: String,
        option_index: usize,
    },
    Disconnect {
        conn_id: String,
    },
    Stats {
        reply: oneshot::Sender<LiveStats>,
    },
}

/// Cloneable handle that queues commands to the hub.
///
/// Every method is a plain enqueue with no reply (except `stats`); a hub that
/// has shut down turns them into silent no-ops.
#[derive(Debug, Clone)]
pub struct LiveHandle {
    tx: mpsc::Sender<Command>,
}

impl LiveHandle {
    /// Register a connection's outbound queue.
    pub async fn connect(&self, conn_id: impl Into<String>, sender: mpsc::Sender<ServerEvent>) {
        let _ = self
            .tx
            .send(Command::Connect {
                conn_id: conn_id.into(),
                sender,
            })
            .await;
    }

    /// Subscribe a connection to a poll's room.
    pub async fn join(&self, conn_id: impl Into<String>, poll_id: impl Into<String>) {
        let _ = self
            .tx
            .send(Command::Join {
                conn_id: conn_id.into(),
                poll_id: poll_id.into(),
            })
            .await;
    }

    /// Apply a vote and fan the new snapshot out to the poll's room.
    pub async fn vote(&self, poll_id: impl Into<String>, option_index: usize) {
        let _ = self
            .tx
            .send(Command::Vote {
                poll_id: poll_id.into(),
                option_index,
            })
            .await;
    }

    /// Remove a connection from every room it belonged to.
    pub async fn disconnect(&self, conn_id: impl Into<String>) {
        let _ = self
            .tx
            .send(Command::Disconnect {
                conn_id: conn_id.into(),
            })
            .await;
    }

    /// Current connection/room counts. Also serves tests as an ordering
    /// barrier: the reply proves every previously queued command has been
    /// processed.
    pub async fn stats(&self) -> LiveStats {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Stats { reply }).await.is_err() {
            return LiveStats::default();
        }
        rx.await.unwrap_or_default()
    }
}

/// Spawn the hub task and return its handle.
pub fn spawn(store: Arc<PollStore>) -> LiveHandle {
    let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE);
    tokio::spawn(async move {
        let mut hub = Hub::new(store);
        while let Some(command) = rx.recv().await {
            hub.handle(command);
        }
        debug!("live hub stopped");
    });
    LiveHandle { tx }
}

/// Hub state. Owned by the spawned task; commands never run concurrently.
struct Hub {
    store: Arc<PollStore>,
    /// conn id -> outbound queue
    conns: HashMap<String, mpsc::Sender<ServerEvent>>,
    /// poll id -> member conn ids
    rooms: HashMap<String, HashSet<String>>,
}

impl Hub {
    fn new(store: Arc<PollStore>) -> Self {
        Self {
            store,
            conns: HashMap::new(),
            rooms: HashMap::new(),
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { conn_id, sender } => {
                self.conns.insert(conn_id, sender);
            }
            Command::Join { conn_id, poll_id } => self.join(conn_id, poll_id),
            Command::Vote {
                poll_id,
                option_index,
            } => self.vote(&poll_id, option_index),
            Command::Disconnect { conn_id } => self.disconnect(&conn_id),
            Command::Stats { reply } => {
                let _ = reply.send(LiveStats {
                    connections: self.conns.len(),
                    rooms: self.rooms.len(),
                });
            }
        }
    }

    fn join(&mut self, conn_id: String, poll_id: String) {
        if !self.conns.contains_key(&conn_id) {
            debug!(conn_id, "join from unregistered connection dropped");
            return;
        }

        self.rooms
            .entry(poll_id.clone())
            .or_default()
            .insert(conn_id.clone());

        // Late or invalid poll ids are tolerated here; the REST lookup path
        // is the authoritative error surface. The member just gets no
        // snapshot until the poll exists and a vote lands.
        match self.store.get_poll(&poll_id) {
            Ok(poll) => {
                if let Some(sender) = self.conns.get(&conn_id) {
                    let _ = sender.try_send(ServerEvent::Poll { poll });
                }
                info!(conn_id, poll_id, "viewer joined");
            }
            Err(_) => debug!(conn_id, poll_id, "join for unknown poll"),
        }
    }

    fn vote(&mut self, poll_id: &str, option_index: usize) {
        // Unknown poll or out-of-range index: the store declines and the
        // vote is dropped without a response.
        let Some(poll) = self.store.cast_vote(poll_id, option_index) else {
            debug!(poll_id, option_index, "invalid vote dropped");
            return;
        };

        let Some(members) = self.rooms.get(poll_id) else {
            return;
        };
        for conn_id in members {
            if let Some(sender) = self.conns.get(conn_id) {
                let _ = sender.try_send(ServerEvent::Update { poll: poll.clone() });
            }
        }
    }

    fn disconnect(&mut self, conn_id: &str) {
        self.conns.remove(conn_id);
        self.rooms.retain(|_, members| {
            members.remove(conn_id);
            !members.is_empty()
        });
    }
}
