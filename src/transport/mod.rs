//! Transport between the coordinator and its workers
//!
//! Point-to-point, ordered message delivery keyed by a stable [`NodeId`].
//! The coordinator side is a [`Hub`]: one fan-in inbox receiving envelopes
//! from every worker, plus a dynamic map of per-worker command channels.
//! The worker side is an [`Endpoint`]. Ordering is guaranteed only within a
//! single sender-to-receiver stream; nothing is assumed about the arrival
//! order across different workers.
//!
//! Workers join by calling [`Hub::connect`], which mints a fresh id; no
//! renumbering is needed when the pool grows or shrinks.

pub mod protocol;

use crate::error::{Error, Result};
use crate::transport::protocol::{Command, Envelope, Reply};
use crossbeam::channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Stable identifier for one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Coordinator-side end of the transport
pub struct Hub {
    inbox_tx: Sender<Envelope>,
    inbox: Receiver<Envelope>,
    links: HashMap<NodeId, Sender<Command>>,
    next_id: u32,
}

impl Hub {
    /// Create a hub with no connected workers
    pub fn new() -> Self {
        let (inbox_tx, inbox) = unbounded();
        Self {
            inbox_tx,
            inbox,
            links: HashMap::new(),
            next_id: 0,
        }
    }

    /// Open a channel pair for a new worker and hand back its endpoint
    pub fn connect(&mut self) -> Endpoint {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = unbounded();
        self.links.insert(id, tx);
        Endpoint {
            id,
            commands: rx,
            replies: self.inbox_tx.clone(),
        }
    }

    /// Drop the command channel for a worker that has left the pool
    pub fn disconnect(&mut self, id: NodeId) -> bool {
        self.links.remove(&id).is_some()
    }

    /// Number of connected workers
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no worker is connected
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Connected worker ids, in ascending order
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.links.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Send a command to one worker
    pub fn send(&self, to: NodeId, command: Command) -> Result<()> {
        let link = self.links.get(&to).ok_or_else(|| Error::Channel {
            node: to,
            reason: "not connected".to_string(),
        })?;
        link.send(command).map_err(|_| Error::Channel {
            node: to,
            reason: "command channel closed".to_string(),
        })
    }

    /// Wait for the next envelope from any worker
    ///
    /// Returns `None` if nothing arrives within `timeout`; the caller
    /// decides whether that means a lost peer.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Envelope> {
        self.inbox.recv_timeout(timeout).ok()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-side end of the transport
pub struct Endpoint {
    id: NodeId,
    commands: Receiver<Command>,
    replies: Sender<Envelope>,
}

impl Endpoint {
    /// The identity this endpoint answers to
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Block until the coordinator sends the next command
    pub fn recv(&self) -> Result<Command> {
        self.commands.recv().map_err(|_| Error::Channel {
            node: self.id,
            reason: "coordinator hung up".to_string(),
        })
    }

    /// Send a reply back to the coordinator, stamped with this node's id
    /// and the time spent on the task
    pub fn send(&self, reply: Reply, elapsed: Duration) -> Result<()> {
        let envelope = Envelope {
            from: self.id,
            elapsed_us: elapsed.as_micros() as u64,
            reply,
        };
        self.replies.send(envelope).map_err(|_| Error::Channel {
            node: self.id,
            reason: "reply channel closed".to_string(),
        })
    }
}
