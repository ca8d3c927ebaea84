//! # koban-testkit
//!
//! Testing utilities for koban.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic wallets, pre-signed transfer records,
//!   and pre-mined ledgers for setting up test scenarios
//! - **Generators**: proptest strategies for property-based testing
//! - **MemoryNetwork**: an in-memory [`koban::PeerClient`] wiring
//!   several [`koban::Node`]s together in one process
//!
//! ## Fixtures
//!
//! ```rust
//! use koban_testkit::{seeded_wallet, transfer_record};
//!
//! let sender = seeded_wallet(1);
//! let recipient = seeded_wallet(2);
//! let record = transfer_record(&sender, recipient.address(), 5);
//! assert!(record.signature.is_some());
//! ```
//!
//! ## Multi-node scenarios
//!
//! ```rust
//! use std::sync::Arc;
//! use koban::Node;
//! use koban_sync::Neighbor;
//! use koban_testkit::{test_node_config, MemoryNetwork};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let network = MemoryNetwork::new();
//! let node = Arc::new(Node::new(test_node_config(None), network.clone()));
//! network.register(Neighbor::new("127.0.0.1", 8001), node).await;
//! # });
//! ```

pub mod fixtures;
pub mod generators;
pub mod network;

pub use fixtures::{
    mined_ledger, parties, seeded_wallet, test_ledger_config, test_node_config, transfer_record,
};
pub use network::MemoryNetwork;
