//! The node facade: one ledger behind one exclusive-access boundary,
//! plus the peer fan-out around it.
//!
//! Locking discipline: the ledger mutex is the single-writer boundary
//! for the chain and the pending pool. The proof-of-work search runs on
//! a snapshot with the lock released; snapshot and commit each hold the
//! lock, and the commit re-checks the head so a consensus replacement
//! during the search discards the stale block instead of appending it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{info, warn};

use koban_core::{Block, Transaction, TransactionRecord};
use koban_ledger::{proof_of_work, Ledger};
use koban_sync::{select_longest_valid, Neighbor, PeerClient, ResolveOutcome};

use crate::config::NodeConfig;
use crate::error::Result;

/// What a mining request produced.
#[derive(Debug, Clone)]
pub enum MineOutcome {
    /// A block was mined and committed.
    Mined(Block),
    /// No reward address configured or the chain is empty.
    NotReady,
    /// Another mining request is already in flight.
    Busy,
    /// The chain head moved during the nonce search; block discarded.
    Stale,
}

/// One peer call, fanned out to every neighbor.
#[derive(Clone)]
enum PeerCall {
    Transaction(TransactionRecord),
    ClearPending,
    Consensus,
}

impl PeerCall {
    fn name(&self) -> &'static str {
        match self {
            PeerCall::Transaction(_) => "send_transaction",
            PeerCall::ClearPending => "clear_pending",
            PeerCall::Consensus => "trigger_consensus",
        }
    }
}

/// A single ledger node.
pub struct Node {
    ledger: Mutex<Ledger>,
    peers: Arc<dyn PeerClient>,
    neighbors: RwLock<Vec<Neighbor>>,
    mining: AtomicBool,
    config: NodeConfig,
}

impl Node {
    pub fn new(config: NodeConfig, peers: Arc<dyn PeerClient>) -> Self {
        let ledger = Ledger::new(config.ledger.clone(), config.blockchain_address.clone());
        Self {
            ledger: Mutex::new(ledger),
            peers,
            neighbors: RwLock::new(Vec::new()),
            mining: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The committed chain (a snapshot; the ledger keeps ownership).
    pub async fn chain(&self) -> Vec<Block> {
        self.ledger.lock().await.chain().to_vec()
    }

    /// The pending pool (a snapshot).
    pub async fn pending(&self) -> Vec<Transaction> {
        self.ledger.lock().await.pending().to_vec()
    }

    pub async fn balance(&self, address: &str) -> i128 {
        self.ledger.lock().await.calculate_balance(address)
    }

    /// Install a fresh neighbor snapshot (owned by the discovery pass).
    pub async fn set_neighbors(&self, neighbors: Vec<Neighbor>) {
        *self.neighbors.write().await = neighbors;
    }

    pub async fn neighbors(&self) -> Vec<Neighbor> {
        self.neighbors.read().await.clone()
    }

    /// Accept a transfer from this node's own caller and propagate it.
    ///
    /// `Ok(false)` means the signature did not verify and nothing was
    /// appended or propagated. On success the record fans out to every
    /// neighbor, best-effort.
    pub async fn create_transaction(&self, record: TransactionRecord) -> Result<bool> {
        let transfer = record
            .clone()
            .classify(&self.config.ledger.mining_sender)?;
        let added = self.ledger.lock().await.add_transaction(&transfer)?;
        if !added {
            return Ok(false);
        }
        self.fan_out(PeerCall::Transaction(record)).await;
        Ok(true)
    }

    /// Accept a transfer propagated by a sibling (no re-propagation).
    pub async fn receive_transaction(&self, record: TransactionRecord) -> Result<bool> {
        let transfer = record.classify(&self.config.ledger.mining_sender)?;
        Ok(self.ledger.lock().await.add_transaction(&transfer)?)
    }

    /// Drop the pending pool (sibling committed these transactions).
    pub async fn clear_pending(&self) {
        self.ledger.lock().await.clear_pending();
    }

    /// Mine one block.
    ///
    /// Non-blocking with respect to other miners: a second request while
    /// one is in flight returns [`MineOutcome::Busy`] immediately.
    pub async fn mine(&self) -> Result<MineOutcome> {
        if self
            .mining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(MineOutcome::Busy);
        }
        let outcome = self.mine_once().await;
        self.mining.store(false, Ordering::Release);
        outcome
    }

    async fn mine_once(&self) -> Result<MineOutcome> {
        // Snapshot under the lock; search with the lock released.
        let snapshot = self.ledger.lock().await.mining_snapshot()?;
        let Some(snapshot) = snapshot else {
            return Ok(MineOutcome::NotReady);
        };

        let nonce = proof_of_work(
            &snapshot.transactions,
            &snapshot.previous_hash,
            self.config.ledger.difficulty,
        )?;

        let committed = self.ledger.lock().await.commit_mined(&snapshot, nonce)?;
        let Some(block) = committed else {
            return Ok(MineOutcome::Stale);
        };

        // Siblings drop the now-committed transfers, then reconcile.
        self.fan_out(PeerCall::ClearPending).await;
        self.fan_out(PeerCall::Consensus).await;
        Ok(MineOutcome::Mined(block))
    }

    /// Run one consensus pass: pull every neighbor's chain, keep the
    /// longest valid one if it beats ours.
    pub async fn resolve_conflicts(&self) -> Result<ResolveOutcome> {
        let neighbors = self.neighbors().await;

        // Concurrent fetch, but results keep neighbor order: the
        // equal-length tie-break is the neighbor snapshot order.
        let mut set = JoinSet::new();
        for (index, neighbor) in neighbors.iter().cloned().enumerate() {
            let peers = Arc::clone(&self.peers);
            let timeout = self.config.peer_timeout;
            set.spawn(async move {
                let result =
                    tokio::time::timeout(timeout, peers.fetch_chain(&neighbor)).await;
                (index, neighbor, result)
            });
        }

        let mut fetched: Vec<Option<Vec<Block>>> = vec![None; neighbors.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, _, Ok(Ok(chain)))) => fetched[index] = Some(chain),
                Ok((_, neighbor, Ok(Err(error)))) => {
                    warn!(%neighbor, %error, "skipping unreachable peer in consensus pass");
                }
                Ok((_, neighbor, Err(_))) => {
                    warn!(%neighbor, "peer chain fetch timed out");
                }
                Err(error) => warn!(%error, "peer fetch task failed"),
            }
        }

        let mut ledger = self.ledger.lock().await;
        let from_len = ledger.chain().len();
        let candidates = fetched.iter().flatten().map(|chain| chain.as_slice());
        let selected =
            select_longest_valid(ledger.chain(), candidates, self.config.ledger.difficulty);

        match selected {
            Some(chain) if ledger.replace_chain(chain.to_vec()) => {
                info!(from_len, to_len = chain.len(), "consensus replaced local chain");
                Ok(ResolveOutcome::Replaced {
                    from_len,
                    to_len: chain.len(),
                })
            }
            _ => Ok(ResolveOutcome::Retained),
        }
    }

    /// Issue one call to every neighbor concurrently, bounded by the
    /// per-peer timeout, and wait for all of them. Failures are logged
    /// and isolated; nothing is retried or rolled back.
    async fn fan_out(&self, call: PeerCall) {
        let neighbors = self.neighbors().await;
        let mut set = JoinSet::new();
        for neighbor in neighbors {
            let peers = Arc::clone(&self.peers);
            let call = call.clone();
            let timeout = self.config.peer_timeout;
            set.spawn(async move {
                let result = tokio::time::timeout(timeout, async {
                    match &call {
                        PeerCall::Transaction(record) => {
                            peers.send_transaction(&neighbor, record).await
                        }
                        PeerCall::ClearPending => peers.clear_pending(&neighbor).await,
                        PeerCall::Consensus => peers.trigger_consensus(&neighbor).await,
                    }
                })
                .await;
                (neighbor, call.name(), result)
            });
        }
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, _, Ok(Ok(())))) => {}
                Ok((neighbor, call, Ok(Err(error)))) => {
                    warn!(%neighbor, call, %error, "peer call failed");
                }
                Ok((neighbor, call, Err(_))) => {
                    warn!(%neighbor, call, "peer call timed out");
                }
                Err(error) => warn!(%error, "peer call task failed"),
            }
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("address", &self.config.blockchain_address)
            .finish_non_exhaustive()
    }
}
