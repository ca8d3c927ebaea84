//! Longest-valid-chain conflict resolution.
//!
//! Pull-based and eventually consistent: a resolution pass looks at
//! whatever chains the reachable peers handed over and keeps the longest
//! one that fully validates. There is no leader election; forks deeper
//! than one block simply wait for a later pass.

use tracing::debug;

use koban_core::Block;
use koban_ledger::validate_chain;

/// What a resolution pass decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A longer valid peer chain was adopted.
    Replaced { from_len: usize, to_len: usize },
    /// The local chain is still the best one we know.
    Retained,
}

/// Select the replacement chain, if any.
///
/// A candidate qualifies when it is strictly longer than `local` and
/// passes full validation at `difficulty`. Among equally long qualifying
/// candidates the first in iteration order wins; callers keep candidate
/// order aligned with the neighbor snapshot so the tie-break is
/// deterministic.
pub fn select_longest_valid<'a, I>(
    local: &[Block],
    candidates: I,
    difficulty: usize,
) -> Option<&'a [Block]>
where
    I: IntoIterator<Item = &'a [Block]>,
{
    let mut best: Option<&'a [Block]> = None;
    let mut best_len = local.len();

    for candidate in candidates {
        if candidate.len() <= best_len {
            continue;
        }
        if !validate_chain(candidate, difficulty) {
            debug!(len = candidate.len(), "skipping invalid peer chain");
            continue;
        }
        best_len = candidate.len();
        best = Some(candidate);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use koban_core::{empty_record_hash, Transaction};
    use koban_ledger::proof_of_work;

    const DIFFICULTY: usize = 2;

    /// Build a valid chain of the given total length on top of a shared
    /// genesis.
    fn build_chain(len: usize, tag: &str) -> Vec<Block> {
        let genesis = Block::new(1_700_000_000, vec![], 0, empty_record_hash().to_hex());
        let mut chain = vec![genesis];
        for height in 1..len {
            let transactions = vec![Transaction::new("THE BLOCKCHAIN", tag, height as u64)];
            let previous_hash = chain[height - 1].hash().unwrap().to_hex();
            let nonce = proof_of_work(&transactions, &previous_hash, DIFFICULTY).unwrap();
            chain.push(Block::new(
                1_700_000_000 + height as i64,
                transactions,
                nonce,
                previous_hash,
            ));
        }
        chain
    }

    #[test]
    fn longer_valid_chain_wins() {
        let local = build_chain(2, "m");
        let peer_long = build_chain(3, "m");
        let peer_same = build_chain(2, "m");

        let candidates = [peer_long.as_slice(), peer_same.as_slice()];
        let selected = select_longest_valid(&local, candidates, DIFFICULTY);
        assert_eq!(selected, Some(peer_long.as_slice()));
    }

    #[test]
    fn tampered_chain_is_ignored() {
        let local = build_chain(2, "m");
        let mut tampered = build_chain(3, "m");
        tampered[2].nonce += 1;

        let candidates = [tampered.as_slice()];
        assert_eq!(
            select_longest_valid(&local, candidates, DIFFICULTY),
            None
        );
    }

    #[test]
    fn equal_length_chains_are_retained() {
        let local = build_chain(3, "m");
        let peer = build_chain(3, "other");
        assert_eq!(
            select_longest_valid(&local, [peer.as_slice()], DIFFICULTY),
            None
        );
    }

    #[test]
    fn first_of_equally_long_candidates_wins() {
        let local = build_chain(1, "m");
        let first = build_chain(3, "a");
        let second = build_chain(3, "b");

        let candidates = [first.as_slice(), second.as_slice()];
        let selected = select_longest_valid(&local, candidates, DIFFICULTY);
        assert_eq!(selected, Some(first.as_slice()));
    }

    #[test]
    fn no_candidates_retains_local() {
        let local = build_chain(2, "m");
        assert_eq!(
            select_longest_valid(&local, std::iter::empty(), DIFFICULTY),
            None
        );
    }
}
