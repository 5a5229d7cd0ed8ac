use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Address used as the sender of synthesized mining reward transactions
pub const REWARD_SENDER: &str = "0";

/// Represents a value transfer between two addresses
///
/// Transactions carry no id or nonce: duplicates are legal and
/// indistinguishable, and the pool treats them as a FIFO multiset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Sender's address
    pub sender: String,

    /// Recipient's address
    pub recipient: String,

    /// Amount being transferred
    pub amount: f64,
}

impl Transaction {
    /// Creates a new transaction
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Creates a mining reward transaction credited to the miner
    pub fn new_reward(miner: impl Into<String>, amount: f64) -> Self {
        Transaction {
            sender: REWARD_SENDER.to_string(),
            recipient: miner.into(),
            amount,
        }
    }

    /// Checks if the transaction is a synthesized mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let transaction = Transaction::new("alice", "bob", 10.5);

        assert_eq!(transaction.sender, "alice");
        assert_eq!(transaction.recipient, "bob");
        assert_eq!(transaction.amount, 10.5);
        assert!(!transaction.is_reward());
    }

    #[test]
    fn test_reward_transaction() {
        let transaction = Transaction::new_reward("miner", 50.0);

        assert_eq!(transaction.sender, REWARD_SENDER);
        assert_eq!(transaction.recipient, "miner");
        assert_eq!(transaction.amount, 50.0);
        assert!(transaction.is_reward());
    }

    #[test]
    fn test_duplicates_are_equal() {
        let a = Transaction::new("alice", "bob", 1.0);
        let b = Transaction::new("alice", "bob", 1.0);

        assert_eq!(a, b);
    }
}
