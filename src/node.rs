use std::sync::{Arc, RwLock};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::blockchain::{
    Block, Chain, ChainError, CryptoError, DigitalSignature, Miner, MinerError, PoolError,
    Transaction, TransactionPool, Wallet,
};
use crate::peer::{PeerError, PeerRegistry};
use crate::token::{TokenError, TokenLedger, TOKEN_NAME, TOKEN_SYMBOL};

/// Errors surfaced by the node facade
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Miner(#[from] MinerError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Node configuration, injected at construction
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Required number of leading '0' hex characters in block hashes
    pub difficulty: u8,

    /// Amount credited to the miner per sealed block; 0 disables rewards
    pub mining_reward: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            difficulty: 3,
            mining_reward: 50.0,
        }
    }
}

/// Aggregate status answered by `/health`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub block_height: usize,
    pub pending_transactions: usize,
    pub peers: usize,
    pub is_valid: bool,
}

/// Aggregate counters answered by `/stats`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_blocks: usize,
    pub total_transactions: usize,
    pub pending_transactions: usize,
    pub connected_peers: usize,
    pub token_name: String,
    pub token_symbol: String,
    pub token_supply: u64,
}

/// Keys returned once at wallet creation; the private key is never stored
#[derive(Debug)]
pub struct WalletKeys {
    pub address: String,
    pub public_key: String,
    pub private_key_hex: String,
}

/// Composes the ledger engine: chain, pool, miner, token ledger, peer
/// registry and the node's current wallet
///
/// All shared state lives behind this aggregate; request handlers hold it
/// through an `Arc` and there are no process-wide globals.
pub struct Node {
    chain: Arc<Chain>,
    pool: Arc<TransactionPool>,
    miner: Miner,
    tokens: TokenLedger,
    peers: PeerRegistry,
    wallet: RwLock<Wallet>,
}

impl Node {
    /// Creates a node with a fresh genesis chain and wallet
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let chain = Arc::new(Chain::new(config.difficulty));
        let pool = Arc::new(TransactionPool::new());
        let miner = Miner::new(chain.clone(), pool.clone(), config.mining_reward);
        let wallet = Wallet::generate()?;

        info!(
            "Node initialized: difficulty {}, reward {}, wallet {}",
            config.difficulty,
            config.mining_reward,
            wallet.address()
        );

        Ok(Node {
            chain,
            pool,
            miner,
            tokens: TokenLedger::new(),
            peers: PeerRegistry::new(),
            wallet: RwLock::new(wallet),
        })
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn tokens(&self) -> &TokenLedger {
        &self.tokens
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    /// Submits a transaction to the pending pool
    pub fn submit_transaction(&self, transaction: Transaction) -> Result<(), NodeError> {
        self.pool.submit(transaction)?;
        Ok(())
    }

    /// Runs one mining cycle, crediting the node wallet
    pub fn mine(&self) -> Result<Block, MinerError> {
        let miner_address = self.wallet.read().unwrap().address().to_string();
        self.miner.mine(&miner_address)
    }

    /// The current node wallet address
    pub fn wallet_address(&self) -> String {
        self.wallet.read().unwrap().address().to_string()
    }

    /// Replaces the node wallet with a freshly generated keypair
    ///
    /// The returned private key is handed to the caller and not retained
    /// anywhere else.
    pub fn create_wallet(&self) -> Result<WalletKeys, NodeError> {
        let wallet = Wallet::generate()?;

        let keys = WalletKeys {
            address: wallet.address().to_string(),
            public_key: wallet.public_key(),
            private_key_hex: hex::encode(wallet.export_secret_key()),
        };

        *self.wallet.write().unwrap() = wallet;

        info!("Node wallet replaced, new address {}", keys.address);

        Ok(keys)
    }

    /// Signs arbitrary data with the node wallet
    pub fn sign(&self, data: &[u8]) -> DigitalSignature {
        self.wallet.read().unwrap().sign(data)
    }

    /// Non-blocking snapshot for `/health`
    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            block_height: self.chain.len(),
            pending_transactions: self.pool.len(),
            peers: self.peers.len(),
            is_valid: self.chain.is_valid(),
        }
    }

    /// Non-blocking snapshot for `/stats`
    pub fn stats(&self) -> StatsReport {
        StatsReport {
            total_blocks: self.chain.len(),
            total_transactions: self.chain.all_transactions().len(),
            pending_transactions: self.pool.len(),
            connected_peers: self.peers.len(),
            token_name: TOKEN_NAME.to_string(),
            token_symbol: TOKEN_SYMBOL.to_string(),
            token_supply: self.tokens.total_supply(),
        }
    }
}
