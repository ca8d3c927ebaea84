//! Node configuration.
//!
//! The node consumes its parameters from the process environment, the
//! same contract the operator scripts use: `MINING_DIFFICULTY`,
//! `MINING_SENDER` and `MINING_REWARD` are required; `NEIGHBOR_HOST`,
//! `PORT` and `BLOCKCHAIN_ADDRESS` are optional.

use std::ops::Range;
use std::time::Duration;

use koban_ledger::LedgerConfig;
use koban_sync::{compose_neighbors, Neighbor};

use crate::error::NodeError;

/// The port window probed for sibling nodes on the shared host.
pub const NEIGHBOR_PORTS: Range<u16> = 8001..8004;

/// Configuration for a single node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Ledger parameters (difficulty, reserved sender, reward).
    pub ledger: LedgerConfig,
    /// Address mining rewards are credited to; mining refuses without it.
    pub blockchain_address: Option<String>,
    /// Host shared by every sibling node in the discovery window.
    pub neighbor_host: Option<String>,
    /// This node's own port, excluded from its neighbor candidates.
    pub port: Option<u16>,
    /// Upper bound on any single peer call.
    pub peer_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            blockchain_address: None,
            neighbor_host: None,
            port: None,
            peer_timeout: Duration::from_secs(5),
        }
    }
}

impl NodeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, NodeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NodeError> {
        let difficulty = require(&lookup, "MINING_DIFFICULTY")?
            .parse::<usize>()
            .map_err(|e| NodeError::Config(format!("MINING_DIFFICULTY: {e}")))?;
        let mining_sender = require(&lookup, "MINING_SENDER")?;
        let mining_reward = require(&lookup, "MINING_REWARD")?
            .parse::<u64>()
            .map_err(|e| NodeError::Config(format!("MINING_REWARD: {e}")))?;

        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|e| NodeError::Config(format!("PORT: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            ledger: LedgerConfig {
                difficulty,
                mining_sender,
                mining_reward,
            },
            blockchain_address: lookup("BLOCKCHAIN_ADDRESS").filter(|a| !a.is_empty()),
            neighbor_host: lookup("NEIGHBOR_HOST").filter(|h| !h.is_empty()),
            port,
            peer_timeout: Duration::from_secs(5),
        })
    }

    /// The candidate neighbor endpoints for this node: every port of the
    /// discovery window on the shared host, minus the node's own port.
    /// Empty when the host or port is not configured.
    pub fn candidate_neighbors(&self) -> Vec<Neighbor> {
        match (self.neighbor_host.as_deref(), self.port) {
            (Some(host), Some(port)) => compose_neighbors(host, NEIGHBOR_PORTS, port),
            _ => Vec::new(),
        }
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, NodeError> {
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(NodeError::Config(format!("{key} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(entries: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            entries
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn full_environment_parses() {
        let config = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "3"),
            ("MINING_SENDER", "THE BLOCKCHAIN"),
            ("MINING_REWARD", "1"),
            ("BLOCKCHAIN_ADDRESS", "1abc"),
        ]))
        .unwrap();

        assert_eq!(config.ledger.difficulty, 3);
        assert_eq!(config.ledger.mining_sender, "THE BLOCKCHAIN");
        assert_eq!(config.ledger.mining_reward, 1);
        assert_eq!(config.blockchain_address.as_deref(), Some("1abc"));
    }

    #[test]
    fn neighbor_environment_parses() {
        let config = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "3"),
            ("MINING_SENDER", "THE BLOCKCHAIN"),
            ("MINING_REWARD", "1"),
            ("NEIGHBOR_HOST", "10.0.0.7"),
            ("PORT", "8002"),
        ]))
        .unwrap();

        assert_eq!(config.neighbor_host.as_deref(), Some("10.0.0.7"));
        assert_eq!(config.port, Some(8002));
        assert_eq!(
            config.candidate_neighbors(),
            vec![
                Neighbor::new("10.0.0.7", 8001),
                Neighbor::new("10.0.0.7", 8003),
            ]
        );
    }

    #[test]
    fn candidate_neighbors_empty_without_host_or_port() {
        let config = NodeConfig::default();
        assert!(config.candidate_neighbors().is_empty());

        let host_only = NodeConfig {
            neighbor_host: Some("10.0.0.7".into()),
            ..NodeConfig::default()
        };
        assert!(host_only.candidate_neighbors().is_empty());
    }

    #[test]
    fn malformed_port_is_an_error() {
        let result = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "3"),
            ("MINING_SENDER", "THE BLOCKCHAIN"),
            ("MINING_REWARD", "1"),
            ("PORT", "eight"),
        ]));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn missing_required_variable_is_an_error() {
        let result = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "3"),
            ("MINING_REWARD", "1"),
        ]));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn empty_required_variable_is_an_error() {
        let result = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "3"),
            ("MINING_SENDER", ""),
            ("MINING_REWARD", "1"),
        ]));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let result = NodeConfig::from_lookup(vars(&[
            ("MINING_DIFFICULTY", "three"),
            ("MINING_SENDER", "THE BLOCKCHAIN"),
            ("MINING_REWARD", "1"),
        ]));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
