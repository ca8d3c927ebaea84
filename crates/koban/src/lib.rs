//! # koban
//!
//! A single node of a small proof-of-work demonstration ledger: signed
//! transfers are pooled, batched into blocks by a nonce search, and
//! reconciled with sibling nodes through a longest-valid-chain rule.
//!
//! ## Key Concepts
//!
//! - **Transfer**: a sender/recipient/value triple, signed over its
//!   canonical key-sorted encoding. Reward transfers carry the reserved
//!   mining sender and bypass verification by design.
//! - **Block**: immutable once committed; linked by the SHA-256 of the
//!   previous block's canonical encoding.
//! - **Proof-of-work**: brute-force nonce search until the guess hash
//!   carries the configured number of leading hex zeros.
//! - **Consensus**: pull-based; the longest fully-valid peer chain
//!   replaces the local one wholesale.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use koban::{Node, NodeConfig};
//! use koban::core::{signed_record, Transaction, Wallet};
//!
//! async fn example(peers: Arc<dyn koban::sync::PeerClient>) {
//!     let miner = Wallet::generate();
//!
//!     let mut config = NodeConfig::default();
//!     config.blockchain_address = Some(miner.address().to_string());
//!     let node = Node::new(config, peers);
//!
//!     let sender = Wallet::generate();
//!     let transfer = Transaction::new(sender.address(), miner.address(), 5);
//!     let record = signed_record(transfer, sender.keypair()).unwrap();
//!
//!     node.create_transaction(record).await.unwrap();
//!     node.mine().await.unwrap();
//! }
//! ```
//!
//! This crate is the engine only: the HTTP surface that serves these
//! operations, process startup, and the timers that refresh neighbors
//! and trigger consensus passes live outside it.

pub mod config;
pub mod error;
pub mod node;

// Re-export component crates
pub use koban_core as core;
pub use koban_ledger as ledger;
pub use koban_sync as sync;

// Re-export main types for convenience
pub use config::{NodeConfig, NEIGHBOR_PORTS};
pub use error::{NodeError, Result};
pub use node::{MineOutcome, Node};

// Re-export commonly used component types
pub use koban_core::{
    Block, Keypair, Sha256Hash, Transaction, TransactionRecord, Transfer, Wallet,
};
pub use koban_ledger::{Ledger, LedgerConfig};
pub use koban_sync::{Neighbor, PeerClient, ResolveOutcome};
