//! In-memory peer network.
//!
//! A [`PeerClient`] that routes calls directly to registered [`Node`]s,
//! so multi-node scenarios run in one process with no sockets. Endpoints
//! that were never registered fail with `UnknownNeighbor`, which doubles
//! as the unreachable-peer case in tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use koban::Node;
use koban_core::{Block, TransactionRecord};
use koban_sync::{Neighbor, PeerClient, PeerError, Result};

/// Shared registry wiring several nodes together.
pub struct MemoryNetwork {
    nodes: RwLock<HashMap<Neighbor, Arc<Node>>>,
}

impl MemoryNetwork {
    /// Create an empty network.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            nodes: RwLock::new(HashMap::new()),
        })
    }

    /// Register a node under an endpoint, replacing any previous holder.
    pub async fn register(&self, neighbor: Neighbor, node: Arc<Node>) {
        self.nodes.write().await.insert(neighbor, node);
    }

    /// Drop a node from the network, making it unreachable.
    pub async fn disconnect(&self, neighbor: &Neighbor) {
        self.nodes.write().await.remove(neighbor);
    }

    async fn node(&self, neighbor: &Neighbor) -> Result<Arc<Node>> {
        self.nodes
            .read()
            .await
            .get(neighbor)
            .cloned()
            .ok_or_else(|| PeerError::UnknownNeighbor(neighbor.to_string()))
    }
}

impl Default for MemoryNetwork {
    fn default() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PeerClient for MemoryNetwork {
    async fn fetch_chain(&self, neighbor: &Neighbor) -> Result<Vec<Block>> {
        Ok(self.node(neighbor).await?.chain().await)
    }

    async fn send_transaction(
        &self,
        neighbor: &Neighbor,
        record: &TransactionRecord,
    ) -> Result<()> {
        let node = self.node(neighbor).await?;
        node.receive_transaction(record.clone())
            .await
            .map_err(|error| PeerError::Protocol {
                neighbor: neighbor.to_string(),
                reason: error.to_string(),
            })?;
        Ok(())
    }

    async fn clear_pending(&self, neighbor: &Neighbor) -> Result<()> {
        self.node(neighbor).await?.clear_pending().await;
        Ok(())
    }

    async fn trigger_consensus(&self, neighbor: &Neighbor) -> Result<()> {
        let node = self.node(neighbor).await?;
        node.resolve_conflicts()
            .await
            .map_err(|error| PeerError::Protocol {
                neighbor: neighbor.to_string(),
                reason: error.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_node_config;

    #[tokio::test]
    async fn unknown_neighbor_is_an_error() {
        let network = MemoryNetwork::new();
        let peers: Arc<dyn PeerClient> = network.clone();

        let result = peers.fetch_chain(&Neighbor::new("127.0.0.1", 8001)).await;
        assert!(matches!(result, Err(PeerError::UnknownNeighbor(_))));
    }

    #[tokio::test]
    async fn registered_node_serves_its_chain() {
        let network = MemoryNetwork::new();
        let endpoint = Neighbor::new("127.0.0.1", 8001);
        let node = Arc::new(Node::new(test_node_config(None), network.clone()));
        network.register(endpoint.clone(), node).await;

        let chain = network.fetch_chain(&endpoint).await.unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[tokio::test]
    async fn disconnect_makes_a_node_unreachable() {
        let network = MemoryNetwork::new();
        let endpoint = Neighbor::new("127.0.0.1", 8001);
        let node = Arc::new(Node::new(test_node_config(None), network.clone()));
        network.register(endpoint.clone(), node).await;
        network.disconnect(&endpoint).await;

        let result = network.fetch_chain(&endpoint).await;
        assert!(matches!(result, Err(PeerError::UnknownNeighbor(_))));
    }
}
