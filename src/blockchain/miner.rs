use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use super::block::Block;
use super::chain::{Chain, ChainError};
use super::pool::TransactionPool;
use super::transaction::Transaction;

/// How many nonces to try between abort-flag polls
const ABORT_CHECK_INTERVAL: u64 = 1024;

/// Errors that can occur during mining
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("Nothing to mine: transaction pool is empty")]
    NothingToMine,

    #[error("Mining aborted")]
    Aborted,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Handle for cancelling an in-progress mining search
#[derive(Debug, Clone)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Requests that the current search stop with no side effects
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// Proof-of-work mining engine
///
/// A mining cycle moves through `Idle -> Searching -> (Sealed | Aborted)`.
/// The search runs against immutable snapshots of the pool and chain head
/// taken at start, holds no shared lock, and only re-acquires the chain lock
/// when sealing. Losing the seal race (`ChainError::Conflict`) discards the
/// result and restarts against the new head.
#[derive(Debug)]
pub struct Miner {
    chain: Arc<Chain>,
    pool: Arc<TransactionPool>,
    reward: f64,
    abort: Arc<AtomicBool>,
}

impl Miner {
    pub fn new(chain: Arc<Chain>, pool: Arc<TransactionPool>, reward: f64) -> Self {
        Miner {
            chain,
            pool,
            reward,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that can cancel the next search
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            flag: self.abort.clone(),
        }
    }

    /// Runs one mining cycle and returns the sealed block
    ///
    /// Transactions submitted after the search starts are not included; they
    /// stay in the pool for the next cycle. The reward transaction is
    /// synthesized once per sealed block and never enters the pool.
    pub fn mine(&self, miner_address: &str) -> Result<Block, MinerError> {
        self.abort.store(false, Ordering::Relaxed);

        loop {
            // Head before pool: once a competing seal is visible through
            // `latest`, its transactions are already drained, so a snapshot
            // taken afterwards can never resurrect confirmed transactions.
            let head = self.chain.latest();

            let snapshot = self.pool.snapshot();
            if snapshot.is_empty() {
                return Err(MinerError::NothingToMine);
            }

            let mut transactions = snapshot;
            if self.reward > 0.0 {
                transactions.push(Transaction::new_reward(miner_address, self.reward));
            }

            debug!(
                "Searching for proof of work on top of block {} ({} transactions)",
                head.index,
                transactions.len()
            );

            let candidate = self.search(
                head.index + 1,
                transactions,
                head.hash,
                Some(miner_address.to_string()),
            )?;

            match self.chain.append_block(candidate.clone(), &self.pool) {
                Ok(()) => {
                    info!(
                        "Sealed block {} with nonce {}",
                        candidate.index, candidate.nonce
                    );
                    return Ok(candidate);
                }
                Err(ChainError::Conflict { .. }) => {
                    // A competing block landed first. Discard and restart
                    // against the new head with fresh snapshots.
                    info!("Lost seal race at block {}, restarting search", candidate.index);
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Increments the nonce from 0 until the block hash meets the difficulty
    fn search(
        &self,
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
        miner: Option<String>,
    ) -> Result<Block, MinerError> {
        let difficulty = self.chain.difficulty();
        let mut nonce = 0u64;

        loop {
            if nonce % ABORT_CHECK_INTERVAL == 0 && self.abort.load(Ordering::Relaxed) {
                return Err(MinerError::Aborted);
            }

            let block = Block::new(
                index,
                transactions.clone(),
                previous_hash.clone(),
                nonce,
                miner.clone(),
            );

            if Block::satisfies_difficulty(&block.hash, difficulty) {
                return Ok(block);
            }

            nonce += 1;
        }
    }
}
