// Blockchain module
//
// Core ledger engine:
// - Block structure and hash format
// - Append-only chain with validation
// - Pending transaction pool
// - Proof of work mining engine
// - Wallet cryptography

pub mod block;
pub mod chain;
pub mod crypto;
pub mod miner;
pub mod pool;
pub mod transaction;

// Re-export main components for easier access
pub use block::Block;
pub use chain::{Chain, ChainError};
pub use crypto::{verify_signature, CryptoError, DigitalSignature, Wallet};
pub use miner::{AbortHandle, Miner, MinerError};
pub use pool::{PoolError, TransactionPool};
pub use transaction::Transaction;
