use std::sync::Mutex;

use log::{info, warn};
use thiserror::Error;

/// Errors that can occur during peer registry operations
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Invalid peer address: {0} (expected HOST:PORT)")]
    InvalidAddress(String),
}

/// Deduplicated set of known peer addresses
///
/// A passive address book: the registry validates and remembers `host:port`
/// strings in insertion order, which keeps `list` stable for the lifetime of
/// the process. Transport and gossip live elsewhere.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: Mutex<Vec<String>>,
}

impl PeerRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        PeerRegistry {
            peers: Mutex::new(Vec::new()),
        }
    }

    /// Checks that an address is a syntactically well-formed `host:port`
    fn validate(address: &str) -> Result<(), PeerError> {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| PeerError::InvalidAddress(address.to_string()))?;

        if host.trim().is_empty() {
            return Err(PeerError::InvalidAddress(address.to_string()));
        }

        if port.parse::<u16>().is_err() {
            return Err(PeerError::InvalidAddress(address.to_string()));
        }

        Ok(())
    }

    /// Adds a peer address; adding a known address is a silent no-op
    pub fn add(&self, address: &str) -> Result<(), PeerError> {
        if let Err(err) = Self::validate(address) {
            warn!("Rejected peer address {:?}", address);
            return Err(err);
        }

        let mut peers = self.peers.lock().unwrap();

        if !peers.iter().any(|peer| peer == address) {
            info!("Added peer {}", address);
            peers.push(address.to_string());
        }

        Ok(())
    }

    /// Insertion-order snapshot of known peers
    pub fn list(&self) -> Vec<String> {
        self.peers.lock().unwrap().clone()
    }

    /// Number of known peers
    pub fn len(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    /// Checks whether any peers are known
    pub fn is_empty(&self) -> bool {
        self.peers.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list() {
        let registry = PeerRegistry::new();

        registry.add("10.0.0.1:8080").unwrap();
        registry.add("node.example.com:9000").unwrap();

        assert_eq!(registry.list(), vec!["10.0.0.1:8080", "node.example.com:9000"]);
    }

    #[test]
    fn test_duplicate_add_is_a_no_op() {
        let registry = PeerRegistry::new();

        registry.add("10.0.0.1:8080").unwrap();
        registry.add("10.0.0.1:8080").unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_addresses_rejected() {
        let registry = PeerRegistry::new();

        assert!(registry.add("").is_err());
        assert!(registry.add("no-port").is_err());
        assert!(registry.add(":8080").is_err());
        assert!(registry.add("host:notaport").is_err());
        assert!(registry.add("host:70000").is_err());

        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_order_is_stable() {
        let registry = PeerRegistry::new();

        registry.add("a:1").unwrap();
        registry.add("b:2").unwrap();
        registry.add("a:1").unwrap();
        registry.add("c:3").unwrap();

        assert_eq!(registry.list(), vec!["a:1", "b:2", "c:3"]);
    }
}
