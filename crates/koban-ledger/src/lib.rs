//! # koban-ledger
//!
//! The chain + pending-pool state machine of a koban node.
//!
//! Owns the committed [`Block`](koban_core::Block) sequence and the pool
//! of not-yet-mined transfers, and exposes every mutation the node
//! performs: appending verified transfers, committing blocks, mining via
//! proof-of-work, validating peer chains, swapping in a longer valid
//! chain, and folding balances.
//!
//! The ledger itself is synchronous and single-threaded; the `koban`
//! facade wraps it in one exclusive-access boundary per node.

pub mod ledger;

pub use ledger::{
    proof_of_work, valid_proof, validate_chain, Ledger, LedgerConfig, MiningSnapshot,
};
