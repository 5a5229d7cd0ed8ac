use std::sync::Mutex;

use log::{info, warn};
use thiserror::Error;

use super::block::Block;
use super::pool::TransactionPool;
use super::transaction::Transaction;

/// Errors that can occur during chain operations
#[derive(Debug, Error)]
pub enum ChainError {
    /// Another block was appended concurrently; the candidate no longer
    /// extends the head. Miners treat this as a retry signal.
    #[error("Chain conflict: candidate index {index} does not extend head {head_index}")]
    Conflict { index: u64, head_index: u64 },

    #[error("Invalid proof of work for block {index}: hash does not meet difficulty {difficulty}")]
    InvalidProofOfWork { index: u64, difficulty: u8 },

    #[error("Invalid content for block {index}: stored hash disagrees with recomputed hash")]
    InvalidContent { index: u64 },

    #[error("Broken link at block {index}: previous_hash does not match predecessor")]
    BrokenLink { index: u64 },

    #[error("Block not found: index {index} out of range (chain length {length})")]
    NotFound { index: u64, length: usize },
}

/// The append-only block ledger
///
/// Never empty: a genesis block is created on construction. Appends go
/// through `append_block` under a single writer lock; reads copy snapshots
/// and never hold the lock beyond the copy.
#[derive(Debug)]
pub struct Chain {
    blocks: Mutex<Vec<Block>>,
    difficulty: u8,
}

impl Chain {
    /// Creates a new chain containing only the genesis block
    pub fn new(difficulty: u8) -> Self {
        Chain {
            blocks: Mutex::new(vec![Block::genesis()]),
            difficulty,
        }
    }

    /// The configured proof-of-work difficulty
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Number of blocks in the chain, genesis included
    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    /// Gets the most recent block
    pub fn latest(&self) -> Block {
        let blocks = self.blocks.lock().unwrap();
        blocks.last().unwrap().clone()
    }

    /// Bounds-checked block lookup
    pub fn block_at(&self, index: u64) -> Result<Block, ChainError> {
        let blocks = self.blocks.lock().unwrap();

        blocks
            .get(index as usize)
            .cloned()
            .ok_or(ChainError::NotFound {
                index,
                length: blocks.len(),
            })
    }

    /// Gets a copy of the entire chain
    pub fn all_blocks(&self) -> Vec<Block> {
        self.blocks.lock().unwrap().clone()
    }

    /// All confirmed transactions across all blocks, in chain order
    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.blocks
            .lock()
            .unwrap()
            .iter()
            .flat_map(|block| block.transactions.iter().cloned())
            .collect()
    }

    /// Appends a candidate block after full validation
    ///
    /// The candidate must extend the current head, carry its correct
    /// recomputed hash, and satisfy the difficulty predicate. On success the
    /// chain is extended and the included transactions leave the pool, both
    /// inside the same writer critical section: a candidate sealed against a
    /// stale head fails with `Conflict` instead of forking, and a competing
    /// miner can never observe the new head with an undrained pool.
    pub fn append_block(&self, candidate: Block, pool: &TransactionPool) -> Result<(), ChainError> {
        let mut blocks = self.blocks.lock().unwrap();
        let head = blocks.last().unwrap();

        if candidate.index != head.index + 1 || candidate.previous_hash != head.hash {
            warn!(
                "Rejecting block {}: does not extend head {}",
                candidate.index, head.index
            );
            return Err(ChainError::Conflict {
                index: candidate.index,
                head_index: head.index,
            });
        }

        if candidate.hash != candidate.compute_hash() {
            return Err(ChainError::InvalidContent {
                index: candidate.index,
            });
        }

        if !Block::satisfies_difficulty(&candidate.hash, self.difficulty) {
            return Err(ChainError::InvalidProofOfWork {
                index: candidate.index,
                difficulty: self.difficulty,
            });
        }

        info!(
            "Appended block {} with {} transactions",
            candidate.index,
            candidate.transactions.len()
        );

        // Reward transactions were never in the pool; draining them is a no-op
        pool.drain(&candidate.transactions);
        blocks.push(candidate);

        Ok(())
    }

    /// Walks the full chain and returns the first integrity failure
    ///
    /// Verifies, for every block after genesis, that the stored hash matches
    /// its recomputed value, that it links to its predecessor, and that it
    /// satisfies the difficulty predicate. The walk runs on a snapshot copy:
    /// recomputing every hash under the writer lock would stall `append_block`
    /// for the whole O(n) pass.
    pub fn validate(&self) -> Result<(), ChainError> {
        let blocks = self.all_blocks();

        for i in 1..blocks.len() {
            let current = &blocks[i];
            let previous = &blocks[i - 1];

            if current.hash != current.compute_hash() {
                return Err(ChainError::InvalidContent {
                    index: current.index,
                });
            }

            if current.previous_hash != previous.hash {
                return Err(ChainError::BrokenLink {
                    index: current.index,
                });
            }

            if !Block::satisfies_difficulty(&current.hash, self.difficulty) {
                return Err(ChainError::InvalidProofOfWork {
                    index: current.index,
                    difficulty: self.difficulty,
                });
            }
        }

        Ok(())
    }

    /// Boolean chain integrity check
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    #[cfg(test)]
    pub(crate) fn tamper_with(&self, index: usize, mutate: impl FnOnce(&mut Block)) {
        let mut blocks = self.blocks.lock().unwrap();
        mutate(&mut blocks[index]);
    }
}
