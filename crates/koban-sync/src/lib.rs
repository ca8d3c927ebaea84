//! # koban-sync
//!
//! Peer plumbing for koban nodes: neighbor endpoints, the four-call
//! sibling protocol, and longest-valid-chain conflict resolution.
//!
//! ## Peer contract
//!
//! ```text
//! GET    chain            -> Vec<Block>      (fetch_chain)
//! PUT    transaction      <- record          (send_transaction)
//! DELETE transactions                        (clear_pending)
//! PUT    consensus                           (trigger_consensus)
//! ```
//!
//! These calls are invoked, not served, by the core; the serving side is
//! the node's HTTP layer. Every call is best-effort and isolated: one
//! unreachable peer never aborts the fan-out to the others.

pub mod error;
pub mod peer;
pub mod resolver;

pub use error::{PeerError, Result};
pub use peer::{compose_neighbors, Neighbor, PeerClient};
pub use resolver::{select_longest_valid, ResolveOutcome};
