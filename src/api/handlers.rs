use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::blockchain::{verify_signature, Block, DigitalSignature, MinerError, Transaction};
use crate::node::{HealthReport, Node, StatsReport};

/// Shared handle to the node state
pub type NodeData = web::Data<Node>;

/// Request for the create transaction endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TransactionRequest {
    /// The sender's address
    pub sender: String,

    /// The recipient's address
    pub recipient: String,

    /// The amount to transfer
    pub amount: f64,
}

/// Response for the mine endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MineResponse {
    /// The message
    pub message: String,

    /// The newly sealed block
    pub block: Block,
}

/// Response for the create wallet endpoint
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    /// The wallet's address
    pub address: String,

    /// The wallet's public key (base58)
    pub public_key: String,

    /// The wallet's private key (hex encoded); store it yourself,
    /// the node keeps no copy
    pub private_key: String,
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

// ---- /blockchain ----

/// Get the full ordered block list
#[utoipa::path(
    get,
    path = "/blockchain/chain",
    responses((status = 200, description = "Chain retrieved successfully", body = Vec<Block>))
)]
pub async fn get_chain(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().all_blocks())
}

/// Get the most recent block
#[utoipa::path(
    get,
    path = "/blockchain/latest",
    responses((status = 200, description = "Latest block retrieved successfully", body = Block))
)]
pub async fn get_latest_block(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().latest())
}

/// Get a single block by index
#[utoipa::path(
    get,
    path = "/blockchain/block/{index}",
    params(("index" = u64, Path, description = "Block index")),
    responses(
        (status = 200, description = "Block retrieved successfully", body = Block),
        (status = 404, description = "Block index out of range")
    )
)]
pub async fn get_block(node: NodeData, index: web::Path<u64>) -> impl Responder {
    match node.chain().block_at(index.into_inner()) {
        Ok(block) => HttpResponse::Ok().json(block),
        Err(err) => HttpResponse::NotFound().json(error_body(err)),
    }
}

/// Get all confirmed transactions across all blocks
#[utoipa::path(
    get,
    path = "/blockchain/transactions",
    responses((status = 200, description = "Confirmed transactions retrieved successfully", body = Vec<Transaction>))
)]
pub async fn get_confirmed_transactions(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().all_transactions())
}

/// Check chain integrity
#[utoipa::path(
    get,
    path = "/blockchain/isValid",
    responses((status = 200, description = "Chain validity", body = bool))
)]
pub async fn is_valid(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().is_valid())
}

/// Get the chain length
#[utoipa::path(
    get,
    path = "/blockchain/length",
    responses((status = 200, description = "Chain length", body = usize))
)]
pub async fn get_length(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().len())
}

// ---- /mining ----

/// Mine a new block from the pending pool
///
/// The proof-of-work search is CPU-bound, so it runs on a blocking worker
/// instead of the async executor.
#[utoipa::path(
    post,
    path = "/mining/mine",
    responses(
        (status = 200, description = "Block mined successfully", body = MineResponse),
        (status = 400, description = "Transaction pool is empty"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mine_block(node: NodeData) -> impl Responder {
    let worker_node = node.clone();
    let mined = web::block(move || worker_node.mine()).await;

    match mined {
        Ok(Ok(block)) => HttpResponse::Ok().json(MineResponse {
            message: "Block mined successfully".to_string(),
            block,
        }),
        Ok(Err(err @ MinerError::NothingToMine)) => {
            HttpResponse::BadRequest().json(error_body(err))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(error_body(err)),
        Err(err) => HttpResponse::InternalServerError().json(error_body(err)),
    }
}

// ---- /peer ----

#[derive(Deserialize, IntoParams)]
pub struct AddPeerQuery {
    /// Peer address in HOST:PORT form
    pub address: String,
}

/// List known peer addresses
#[utoipa::path(
    get,
    path = "/peer/list",
    responses((status = 200, description = "Peer list retrieved successfully", body = Vec<String>))
)]
pub async fn list_peers(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.peers().list())
}

/// Add a peer address
#[utoipa::path(
    post,
    path = "/peer/add",
    params(AddPeerQuery),
    responses(
        (status = 200, description = "Peer added (or already known)"),
        (status = 400, description = "Malformed peer address")
    )
)]
pub async fn add_peer(node: NodeData, query: web::Query<AddPeerQuery>) -> impl Responder {
    match node.peers().add(&query.address) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Peer added" })),
        Err(err) => HttpResponse::BadRequest().json(error_body(err)),
    }
}

// ---- /transaction ----

/// Submit a transaction to the pending pool
///
/// Admission checks shape only; sender balances are not consulted.
#[utoipa::path(
    post,
    path = "/transaction/create",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction accepted into the pool"),
        (status = 400, description = "Invalid transaction data")
    )
)]
pub async fn create_transaction(
    node: NodeData,
    request: web::Json<TransactionRequest>,
) -> impl Responder {
    let request = request.into_inner();
    let transaction = Transaction::new(request.sender, request.recipient, request.amount);

    match node.submit_transaction(transaction) {
        Ok(()) => HttpResponse::Created()
            .json(serde_json::json!({ "message": "Transaction added to pool" })),
        Err(err) => HttpResponse::BadRequest().json(error_body(err)),
    }
}

/// Get the confirmed transaction history
#[utoipa::path(
    get,
    path = "/transaction/all",
    responses((status = 200, description = "Confirmed transactions retrieved successfully", body = Vec<Transaction>))
)]
pub async fn all_transactions(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.chain().all_transactions())
}

/// Get the current pool snapshot
#[utoipa::path(
    get,
    path = "/transaction/pending",
    responses((status = 200, description = "Pending transactions retrieved successfully", body = Vec<Transaction>))
)]
pub async fn pending_transactions(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.pool().snapshot())
}

// ---- /token ----

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    pub address: String,
}

#[derive(Deserialize, IntoParams)]
pub struct MintQuery {
    pub to: String,
    pub amount: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct TransferQuery {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

/// Get the token balance of an address
#[utoipa::path(
    get,
    path = "/token/balance",
    params(BalanceQuery),
    responses((status = 200, description = "Balance retrieved successfully"))
)]
pub async fn token_balance(node: NodeData, query: web::Query<BalanceQuery>) -> impl Responder {
    let balance = node.tokens().balance_of(&query.address);

    HttpResponse::Ok().json(serde_json::json!({
        "address": query.address,
        "balance": balance,
    }))
}

/// Mint tokens to an address
#[utoipa::path(
    post,
    path = "/token/mint",
    params(MintQuery),
    responses(
        (status = 200, description = "Tokens minted"),
        (status = 400, description = "Invalid address or amount")
    )
)]
pub async fn token_mint(node: NodeData, query: web::Query<MintQuery>) -> impl Responder {
    match node.tokens().mint(&query.to, query.amount) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Tokens minted" })),
        Err(err) => HttpResponse::BadRequest().json(error_body(err)),
    }
}

/// Transfer tokens between addresses
#[utoipa::path(
    post,
    path = "/token/transfer",
    params(TransferQuery),
    responses(
        (status = 200, description = "Transfer successful"),
        (status = 400, description = "Invalid input or insufficient balance")
    )
)]
pub async fn token_transfer(node: NodeData, query: web::Query<TransferQuery>) -> impl Responder {
    match node.tokens().transfer(&query.from, &query.to, query.amount) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Transfer successful" })),
        Err(err) => HttpResponse::BadRequest().json(error_body(err)),
    }
}

// ---- /wallet ----

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    /// Base58 public key
    pub public_key: String,

    /// The data that was signed
    pub data: String,

    /// Base58 signature
    pub signature: String,
}

/// Create a new wallet, replacing the node's current one
///
/// The private key is returned once and must be stored by the caller.
#[utoipa::path(
    post,
    path = "/wallet/create",
    responses(
        (status = 201, description = "Wallet created successfully", body = WalletResponse),
        (status = 500, description = "Entropy source failure")
    )
)]
pub async fn create_wallet(node: NodeData) -> impl Responder {
    match node.create_wallet() {
        Ok(keys) => HttpResponse::Created().json(WalletResponse {
            address: keys.address,
            public_key: keys.public_key,
            private_key: keys.private_key_hex,
        }),
        Err(err) => HttpResponse::InternalServerError().json(error_body(err)),
    }
}

/// Get the current node wallet address
#[utoipa::path(
    get,
    path = "/wallet/address",
    responses((status = 200, description = "Wallet address retrieved successfully"))
)]
pub async fn wallet_address(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "address": node.wallet_address() }))
}

/// Sign arbitrary data with the node wallet
#[utoipa::path(
    post,
    path = "/wallet/sign",
    request_body = String,
    responses((status = 200, description = "Data signed successfully"))
)]
pub async fn wallet_sign(node: NodeData, body: web::Bytes) -> impl Responder {
    let signature = node.sign(&body);

    HttpResponse::Ok().json(serde_json::json!({ "signature": signature.0 }))
}

/// Verify a signature over data against a public key
#[utoipa::path(
    post,
    path = "/wallet/verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Verification result"),
        (status = 400, description = "Malformed key or signature encoding")
    )
)]
pub async fn wallet_verify(query: web::Query<VerifyQuery>) -> impl Responder {
    let signature = DigitalSignature(query.signature.clone());

    match verify_signature(&query.public_key, query.data.as_bytes(), &signature) {
        Ok(valid) => HttpResponse::Ok().json(serde_json::json!({ "isValid": valid })),
        Err(err) => HttpResponse::BadRequest().json(error_body(err)),
    }
}

// ---- root ----

/// API liveness banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API is running"))
)]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().body("chaincore node is running")
}

/// Aggregate node health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health snapshot", body = HealthReport))
)]
pub async fn health(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.health())
}

/// Aggregate node statistics
#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Statistics snapshot", body = StatsReport))
)]
pub async fn stats(node: NodeData) -> impl Responder {
    HttpResponse::Ok().json(node.stats())
}
