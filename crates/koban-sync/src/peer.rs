//! Peer abstraction: neighbor endpoints and the client seam.
//!
//! The client trait mirrors the four calls a node makes against its
//! siblings. Implementations may sit on HTTP or any other transport; the
//! testkit ships an in-memory one wiring several nodes together.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use koban_core::{Block, TransactionRecord};

use crate::error::Result;

/// A reachable sibling endpoint (`host:port`).
///
/// Neighbor sets are snapshots: rebuilt by the discovery pass that owns
/// liveness probing, never mutated in place by the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighbor(String);

impl Neighbor {
    pub fn new(host: &str, port: u16) -> Self {
        Self(format!("{host}:{port}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Neighbor {
    fn from(endpoint: &str) -> Self {
        Self(endpoint.to_string())
    }
}

/// Compose the candidate neighbor endpoints for a node: every port in
/// the discovery window on the shared host prefix, excluding the node's
/// own port. Order is stable; it doubles as the consensus tie-break
/// order.
pub fn compose_neighbors(
    host: &str,
    ports: std::ops::Range<u16>,
    own_port: u16,
) -> Vec<Neighbor> {
    ports
        .filter(|&port| port != own_port)
        .map(|port| Neighbor::new(host, port))
        .collect()
}

/// The four peer calls of the sibling protocol.
///
/// Implementations must be thread-safe; every call targets exactly one
/// neighbor and fails independently of the others.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// `GET` the peer's full committed chain.
    async fn fetch_chain(&self, neighbor: &Neighbor) -> Result<Vec<Block>>;

    /// `PUT` a transfer record into the peer's pending pool.
    async fn send_transaction(
        &self,
        neighbor: &Neighbor,
        record: &TransactionRecord,
    ) -> Result<()>;

    /// `DELETE` the peer's pending pool (after this node commits a block).
    async fn clear_pending(&self, neighbor: &Neighbor) -> Result<()>;

    /// `PUT` a consensus trigger: ask the peer to run a resolution pass.
    async fn trigger_consensus(&self, neighbor: &Neighbor) -> Result<()>;
}
