//! The ledger state machine: committed chain plus pending-transaction pool.
//!
//! The ledger is the only owner of both. All mutation goes through the
//! methods here; callers that share a ledger across tasks wrap it in a
//! single exclusive-access boundary (see the `koban` node facade).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use koban_core::{
    empty_record_hash, verify_signature, Block, CoreError, ProofGuess, Transaction, Transfer,
};

/// Ledger parameters, consumed (not owned) by the node operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Number of leading hex `'0'`s a proof-of-work hash must carry.
    pub difficulty: usize,
    /// Reserved sender identifier marking block-reward transactions.
    pub mining_sender: String,
    /// Reward amount credited per mined block.
    pub mining_reward: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 3,
            mining_sender: "THE BLOCKCHAIN".into(),
            mining_reward: 1,
        }
    }
}

/// Pool and head state captured under the lock before a nonce search.
///
/// Committing through a snapshot keeps transactions that arrive during
/// the search pending instead of silently folding them into a block whose
/// proof does not cover them.
#[derive(Debug, Clone)]
pub struct MiningSnapshot {
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pending_len: usize,
}

/// The chain + pending pool state machine.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    config: LedgerConfig,
    address: Option<String>,
}

impl Ledger {
    /// Create a ledger with its genesis block (no transactions, nonce 0,
    /// `previous_hash` = hash of the canonical empty record).
    pub fn new(config: LedgerConfig, address: Option<String>) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            config,
            address,
        };
        ledger.create_block(0, empty_record_hash().to_hex());
        ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The address mining rewards are credited to, if configured.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Classify and append a transfer to the pending pool.
    ///
    /// Reward transfers are appended unconditionally (explicit trust
    /// boundary). Signed transfers are verified against the supplied
    /// public key; `Ok(false)` means the signature did not check out and
    /// nothing was appended.
    pub fn add_transaction(&mut self, transfer: &Transfer) -> Result<bool, CoreError> {
        match transfer {
            Transfer::Reward(transaction) => {
                self.pending.push(transaction.clone());
                Ok(true)
            }
            Transfer::Signed {
                transaction,
                sender_public_key,
                signature,
            } => {
                let digest = transaction.signing_digest()?;
                if !verify_signature(signature, &digest, sender_public_key) {
                    debug!(
                        sender = %transaction.sender_blockchain_address,
                        "rejected transfer with unverifiable signature"
                    );
                    return Ok(false);
                }
                self.pending.push(transaction.clone());
                Ok(true)
            }
        }
    }

    /// Drop every pending transaction (peer-triggered pool flush).
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Move the whole pending pool into a new block and append it.
    ///
    /// The only chain mutator besides [`Ledger::replace_chain`].
    pub fn create_block(&mut self, nonce: u64, previous_hash: String) -> Block {
        let block = Block::new(
            now_unix(),
            std::mem::take(&mut self.pending),
            nonce,
            previous_hash,
        );
        self.chain.push(block.clone());
        block
    }

    /// Prepare a mining round: check preconditions, append the reward
    /// transaction, and capture the pool and head under one mutation.
    ///
    /// Returns `Ok(None)` when no reward address is configured or the
    /// chain is empty; both refusals are ordinary outcomes, not errors.
    pub fn mining_snapshot(&mut self) -> Result<Option<MiningSnapshot>, CoreError> {
        let Some(address) = self.address.clone() else {
            return Ok(None);
        };
        let Some(head) = self.chain.last() else {
            return Ok(None);
        };
        let previous_hash = head.hash()?.to_hex();

        self.pending.push(Transaction::new(
            self.config.mining_sender.clone(),
            address,
            self.config.mining_reward,
        ));

        Ok(Some(MiningSnapshot {
            transactions: self.pending.clone(),
            previous_hash,
            pending_len: self.pending.len(),
        }))
    }

    /// Commit a block for a completed nonce search.
    ///
    /// Returns `Ok(None)` when the chain head moved since the snapshot
    /// (a consensus pass replaced the chain); the stale block is
    /// discarded. Transactions that arrived after the snapshot stay
    /// pending.
    pub fn commit_mined(
        &mut self,
        snapshot: &MiningSnapshot,
        nonce: u64,
    ) -> Result<Option<Block>, CoreError> {
        let Some(head) = self.chain.last() else {
            return Ok(None);
        };
        if head.hash()?.to_hex() != snapshot.previous_hash {
            debug!("discarding mined block: chain head moved during the nonce search");
            return Ok(None);
        }

        let late_arrivals = if self.pending.len() > snapshot.pending_len {
            self.pending.split_off(snapshot.pending_len)
        } else {
            Vec::new()
        };

        let block = Block::new(
            now_unix(),
            snapshot.transactions.clone(),
            nonce,
            snapshot.previous_hash.clone(),
        );
        self.chain.push(block.clone());
        self.pending = late_arrivals;

        info!(
            height = self.chain.len(),
            transactions = block.transactions.len(),
            nonce,
            "committed mined block"
        );
        Ok(Some(block))
    }

    /// One-shot mining: snapshot, brute-force the nonce, commit.
    ///
    /// `Ok(None)` when preconditions fail (no address, empty chain).
    pub fn mine(&mut self) -> Result<Option<Block>, CoreError> {
        let Some(snapshot) = self.mining_snapshot()? else {
            return Ok(None);
        };
        let nonce = proof_of_work(
            &snapshot.transactions,
            &snapshot.previous_hash,
            self.config.difficulty,
        )?;
        self.commit_mined(&snapshot, nonce)
    }

    /// Validate a chain at this ledger's difficulty.
    pub fn validate_chain(&self, chain: &[Block]) -> bool {
        validate_chain(chain, self.config.difficulty)
    }

    /// Atomically swap in a candidate chain iff it is strictly longer
    /// than the current one and fully valid.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() || !self.validate_chain(&candidate) {
            return false;
        }
        info!(
            from = self.chain.len(),
            to = candidate.len(),
            "replaced chain with longer valid peer chain"
        );
        self.chain = candidate;
        true
    }

    /// Fold every committed transaction into a signed balance for the
    /// address: credited as recipient, debited as sender. The pending
    /// pool does not count, and nothing stops the total going negative.
    ///
    /// Accumulates in `i128`: any `u64` transfer value fits with sign,
    /// so full-range values neither wrap nor overflow the fold.
    pub fn calculate_balance(&self, address: &str) -> i128 {
        let mut total: i128 = 0;
        for block in &self.chain {
            for transaction in &block.transactions {
                if transaction.recipient_blockchain_address == address {
                    total += i128::from(transaction.value);
                }
                if transaction.sender_blockchain_address == address {
                    total -= i128::from(transaction.value);
                }
            }
        }
        total
    }
}

/// Check one proof-of-work guess: the hash of the canonical
/// `{transactions, nonce, previous_hash}` record (timestamp excluded)
/// must start with `difficulty` ASCII `'0'`s in hex.
pub fn valid_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    nonce: u64,
    difficulty: usize,
) -> Result<bool, CoreError> {
    let guess = ProofGuess {
        transactions,
        nonce,
        previous_hash,
    };
    let hex = guess.hash()?.to_hex();
    Ok(hex.len() >= difficulty && hex.as_bytes()[..difficulty].iter().all(|&b| b == b'0'))
}

/// Brute-force the minimal nonce satisfying [`valid_proof`].
///
/// Deterministic: identical inputs always find the same nonce.
pub fn proof_of_work(
    transactions: &[Transaction],
    previous_hash: &str,
    difficulty: usize,
) -> Result<u64, CoreError> {
    let mut nonce: u64 = 0;
    while !valid_proof(transactions, previous_hash, nonce, difficulty)? {
        nonce += 1;
    }
    Ok(nonce)
}

/// Validate linkage and proof for every non-genesis block.
///
/// Empty chains are invalid; the genesis block is never checked against
/// a predecessor. Any hash that fails to compute fails the chain closed.
pub fn validate_chain(chain: &[Block], difficulty: usize) -> bool {
    if chain.is_empty() {
        return false;
    }
    for i in 1..chain.len() {
        let previous = &chain[i - 1];
        let block = &chain[i];

        let Ok(previous_hash) = previous.hash() else {
            return false;
        };
        if block.previous_hash != previous_hash.to_hex() {
            return false;
        }
        match valid_proof(
            &block.transactions,
            &block.previous_hash,
            block.nonce,
            difficulty,
        ) {
            Ok(true) => {}
            _ => return false,
        }
    }
    true
}

/// Current unix time in seconds.
fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
