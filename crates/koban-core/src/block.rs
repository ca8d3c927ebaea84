//! Blocks and the proof-of-work guess preimage.

use serde::{Deserialize, Serialize};

use crate::canonical::hash_canonical;
use crate::crypto::Sha256Hash;
use crate::error::CoreError;
use crate::transaction::Transaction;

/// A committed block. Immutable once appended to a chain.
///
/// The identity hash covers all four fields; the proof-of-work preimage
/// (see [`ProofGuess`]) excludes `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub previous_hash: String,
}

impl Block {
    pub fn new(
        timestamp: i64,
        transactions: Vec<Transaction>,
        nonce: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            timestamp,
            transactions,
            nonce,
            previous_hash,
        }
    }

    /// The block identity hash: SHA-256 of the canonical block encoding.
    ///
    /// The next block's `previous_hash` is the hex of this value.
    pub fn hash(&self) -> Result<Sha256Hash, CoreError> {
        hash_canonical(self)
    }
}

/// The proof-of-work preimage: transactions, nonce and parent linkage,
/// with the timestamp deliberately left out so the guess hash is stable
/// for a given search.
#[derive(Debug, Serialize)]
pub struct ProofGuess<'a> {
    pub transactions: &'a [Transaction],
    pub nonce: u64,
    pub previous_hash: &'a str,
}

impl ProofGuess<'_> {
    pub fn hash(&self) -> Result<Sha256Hash, CoreError> {
        hash_canonical(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonical_bytes;

    fn sample_block() -> Block {
        Block::new(
            1_700_000_000,
            vec![Transaction::new("alice", "bob", 30)],
            7,
            "00abc".into(),
        )
    }

    #[test]
    fn block_hash_covers_all_fields() {
        let block = sample_block();
        let base = block.hash().unwrap();

        let mut late = block.clone();
        late.timestamp += 1;
        assert_ne!(base, late.hash().unwrap());

        let mut renonced = block.clone();
        renonced.nonce += 1;
        assert_ne!(base, renonced.hash().unwrap());
    }

    #[test]
    fn guess_hash_excludes_timestamp() {
        let block = sample_block();
        let mut late = block.clone();
        late.timestamp += 100;

        let guess = |b: &Block| {
            ProofGuess {
                transactions: &b.transactions,
                nonce: b.nonce,
                previous_hash: &b.previous_hash,
            }
            .hash()
            .unwrap()
        };
        assert_eq!(guess(&block), guess(&late));
    }

    #[test]
    fn canonical_block_encoding_is_key_sorted() {
        let block = Block::new(5, vec![], 0, "aa".into());
        assert_eq!(
            canonical_bytes(&block).unwrap(),
            br#"{"nonce":0,"previous_hash":"aa","timestamp":5,"transactions":[]}"#
        );
    }
}
