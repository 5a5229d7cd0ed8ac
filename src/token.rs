use std::collections::HashMap;
use std::sync::Mutex;

use log::info;
use thiserror::Error;

/// Token name exposed through the stats surface
pub const TOKEN_NAME: &str = "ChainToken";

/// Token symbol
pub const TOKEN_SYMBOL: &str = "CTK";

/// Errors that can occur during token ledger operations
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },
}

/// Per-ledger state guarded by a single lock, so a transfer's debit and
/// credit are never separately observable
#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<String, u64>,
    total_supply: u64,
}

/// Fungible token ledger, independent of native chain value transfer
#[derive(Debug, Default)]
pub struct TokenLedger {
    state: Mutex<LedgerState>,
}

impl TokenLedger {
    /// Creates an empty ledger with zero supply
    pub fn new() -> Self {
        TokenLedger {
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn validate_address(address: &str) -> Result<(), TokenError> {
        if address.trim().is_empty() {
            return Err(TokenError::InvalidAddress(
                "address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_amount(amount: u64) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::InvalidAmount(
                "amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Credits `to` with newly created tokens, increasing total supply
    pub fn mint(&self, to: &str, amount: u64) -> Result<(), TokenError> {
        Self::validate_address(to)?;
        Self::validate_amount(amount)?;

        let mut state = self.state.lock().unwrap();
        *state.balances.entry(to.to_string()).or_insert(0) += amount;
        state.total_supply += amount;

        info!(
            "Minted {} tokens to {}. Total supply is now {}",
            amount, to, state.total_supply
        );

        Ok(())
    }

    /// Moves tokens between addresses; total supply is unchanged
    ///
    /// Debit and credit happen atomically: on any failure neither balance
    /// moves.
    pub fn transfer(&self, from: &str, to: &str, amount: u64) -> Result<(), TokenError> {
        Self::validate_address(from)?;
        Self::validate_address(to)?;
        Self::validate_amount(amount)?;

        let mut state = self.state.lock().unwrap();

        let sender_balance = state.balances.get(from).copied().unwrap_or(0);
        if sender_balance < amount {
            return Err(TokenError::InsufficientBalance {
                required: amount,
                available: sender_balance,
            });
        }

        state.balances.insert(from.to_string(), sender_balance - amount);
        *state.balances.entry(to.to_string()).or_insert(0) += amount;

        info!("Transferred {} tokens from {} to {}", amount, from, to);

        Ok(())
    }

    /// Balance query; unknown addresses hold zero
    pub fn balance_of(&self, address: &str) -> u64 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all minted tokens
    pub fn total_supply(&self) -> u64 {
        self.state.lock().unwrap().total_supply
    }
}
