//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic wallets,
//! pre-signed transfer records, and pre-mined ledgers.

use koban::NodeConfig;
use koban_core::{signed_record, Keypair, Transaction, TransactionRecord, Wallet};
use koban_ledger::{Ledger, LedgerConfig};

/// A ledger config with difficulty 2, low enough that tests mine in
/// microseconds but the proof still filters out almost every nonce.
pub fn test_ledger_config() -> LedgerConfig {
    LedgerConfig {
        difficulty: 2,
        ..LedgerConfig::default()
    }
}

/// A node config built on [`test_ledger_config`], optionally with a
/// reward address so the node is allowed to mine.
pub fn test_node_config(miner: Option<&Wallet>) -> NodeConfig {
    NodeConfig {
        ledger: test_ledger_config(),
        blockchain_address: miner.map(|w| w.address().to_string()),
        ..NodeConfig::default()
    }
}

/// A wallet with a deterministic keypair derived from `seed`.
///
/// Panics on `seed == 0` (the all-zero secret key is not on the curve).
pub fn seeded_wallet(seed: u8) -> Wallet {
    assert_ne!(seed, 0, "seed 0 yields an invalid secret key");
    let keypair = Keypair::from_secret_bytes(&[seed; 32]).expect("seeded secret key is valid");
    Wallet::from_keypair(keypair)
}

/// Distinct deterministic wallets for multi-party tests (seeds 1..=count).
pub fn parties(count: usize) -> Vec<Wallet> {
    assert!(count < 256, "seed space is one byte");
    (1..=count).map(|seed| seeded_wallet(seed as u8)).collect()
}

/// A fully signed transfer record from `sender`, ready for the wire.
pub fn transfer_record(sender: &Wallet, recipient: &str, value: u64) -> TransactionRecord {
    let transaction = Transaction::new(sender.address(), recipient, value);
    signed_record(transaction, sender.keypair()).expect("well-formed transfer signs cleanly")
}

/// A ledger whose chain already carries `blocks` mined blocks (plus
/// genesis), each holding one reward transfer to `miner`.
pub fn mined_ledger(config: LedgerConfig, miner: &Wallet, blocks: usize) -> Ledger {
    let mut ledger = Ledger::new(config, Some(miner.address().to_string()));
    for _ in 0..blocks {
        ledger
            .mine()
            .expect("mining never fails at test difficulty")
            .expect("ledger has an address and a genesis block");
    }
    ledger
}
