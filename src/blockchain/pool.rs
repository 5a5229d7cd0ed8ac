use std::sync::Mutex;

use log::debug;
use thiserror::Error;

use super::transaction::Transaction;

/// Errors that can occur during pool operations
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Holds unconfirmed transactions awaiting inclusion in a block, FIFO order
///
/// Admission does not check sender balances: the native chain tracks value
/// transfer separately from the token ledger, and the pool accepts any
/// well-formed transaction.
#[derive(Debug, Default)]
pub struct TransactionPool {
    pending: Mutex<Vec<Transaction>>,
}

impl TransactionPool {
    /// Creates an empty pool
    pub fn new() -> Self {
        TransactionPool {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Adds a transaction to the pool after validating its shape
    pub fn submit(&self, transaction: Transaction) -> Result<(), PoolError> {
        if transaction.sender.trim().is_empty() {
            return Err(PoolError::InvalidTransaction(
                "sender must not be empty".to_string(),
            ));
        }

        if transaction.recipient.trim().is_empty() {
            return Err(PoolError::InvalidTransaction(
                "recipient must not be empty".to_string(),
            ));
        }

        if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
            return Err(PoolError::InvalidTransaction(format!(
                "amount must be positive: {}",
                transaction.amount
            )));
        }

        let mut pending = self.pending.lock().unwrap();
        pending.push(transaction);

        debug!("Pool now holds {} pending transactions", pending.len());

        Ok(())
    }

    /// Returns a copy of the current pool contents without mutating it
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.pending.lock().unwrap().clone()
    }

    /// Number of pending transactions
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Checks whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    /// Removes the given transactions after a successful mine
    ///
    /// Removes one occurrence per included transaction, so duplicates
    /// submitted while mining was in progress survive. Calling this twice
    /// with the same set is a no-op the second time.
    pub fn drain(&self, included: &[Transaction]) {
        let mut pending = self.pending.lock().unwrap();

        for transaction in included {
            if let Some(position) = pending.iter().position(|tx| tx == transaction) {
                pending.remove(position);
            }
        }
    }
}
