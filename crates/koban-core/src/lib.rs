//! # koban-core
//!
//! Pure primitives for the koban ledger: canonical encoding, hashing,
//! keys, wallets, transfers and blocks.
//!
//! This crate contains no I/O and no shared state. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Transaction`] / [`TransactionRecord`] / [`Transfer`] - transfer
//!   payloads and their reward/signed classification
//! - [`Block`] - a committed block; [`ProofGuess`] its timestamp-free
//!   proof-of-work preimage
//! - [`Wallet`] / [`Keypair`] - identities and base58check addresses
//! - [`Sha256Hash`] - digest newtype used for linkage and proof-of-work
//!
//! ## Canonicalization
//!
//! Every hash and signature preimage is key-sorted canonical JSON. See
//! the [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod wallet;

pub use block::{Block, ProofGuess};
pub use canonical::{canonical_bytes, empty_record_hash, hash_canonical};
pub use crypto::{verify_signature, EcdsaSignature, Keypair, Sha256Hash};
pub use error::CoreError;
pub use transaction::{sign_transfer, signed_record, Transaction, TransactionRecord, Transfer};
pub use wallet::{decode_address, derive_address, Wallet, ADDRESS_VERSION};
