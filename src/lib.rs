// chaincore
//
// A proof-of-work blockchain node: append-only chain, pending transaction
// pool, mining engine, wallet cryptography, fungible token ledger and peer
// registry, exposed over a REST API.

pub mod api;
pub mod blockchain;
pub mod node;
pub mod peer;
pub mod token;

pub use node::{Node, NodeConfig, NodeError};
