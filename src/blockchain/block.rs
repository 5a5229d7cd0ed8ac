use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::transaction::Transaction;

/// Sentinel used as the previous hash of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Represents a block in the blockchain
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Block {
    /// Version of the block hash format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Index of the block in the chain (0 = genesis)
    pub index: u64,

    /// Timestamp when the block was created
    #[schema(value_type = String, example = "2023-01-01T12:00:00Z")]
    pub timestamp: DateTime<Utc>,

    /// List of transactions included in this block, in mining inclusion order
    pub transactions: Vec<Transaction>,

    /// Hash of the previous block ("0" for genesis)
    pub previous_hash: String,

    /// Proof of work search counter
    pub nonce: u64,

    /// Address credited for mining this block, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,

    /// Hash of the current block (calculated)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
}

/// Current block hash format version
fn default_version() -> u32 {
    1
}

impl Block {
    /// Creates a new block with the given nonce, computing its hash
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
        nonce: u64,
        miner: Option<String>,
    ) -> Self {
        let block = Block {
            version: default_version(),
            index,
            timestamp: Utc::now(),
            transactions,
            previous_hash,
            nonce,
            miner,
            hash: String::new(),
        };

        let hash = block.compute_hash();

        Block { hash, ..block }
    }

    /// Creates the genesis block (index 0, no transactions)
    ///
    /// Genesis is exempt from the difficulty predicate.
    pub fn genesis() -> Self {
        Block::new(0, Vec::new(), GENESIS_PREVIOUS_HASH.to_string(), 0, None)
    }

    /// Computes the hash of the block (hash format v1)
    ///
    /// SHA-256 over the JSON encoding of every field except `hash` itself.
    /// `serde_json` emits the top-level keys in lexicographic order (`index`,
    /// `miner`, `nonce`, `previous_hash`, `timestamp`, `transactions`,
    /// `version`); transaction objects keep their declaration order (`sender`,
    /// `recipient`, `amount`). An absent miner encodes as `null`. Rendered as
    /// lowercase hex.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();

        let block_data = serde_json::json!({
            "version": self.version,
            "index": self.index,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
            "previous_hash": self.previous_hash,
            "nonce": self.nonce,
            "miner": self.miner,
        });

        // json! over fixed fields is infallible to serialize
        let block_string = serde_json::to_string(&block_data).unwrap();

        hasher.update(block_string.as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Checks whether the hash satisfies the difficulty predicate
    /// (at least `difficulty` leading '0' hex characters)
    pub fn satisfies_difficulty(hash: &str, difficulty: u8) -> bool {
        let target = "0".repeat(difficulty as usize);
        hash.starts_with(&target)
    }
}
