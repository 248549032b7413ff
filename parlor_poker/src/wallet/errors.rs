//! Wallet error types.

use thiserror::Error;

use crate::game::entities::{Usd, Username};

/// Wallet errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum WalletError {
    /// Insufficient balance
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Usd, required: Usd },

    /// Wallet not found
    #[error("wallet not found for {0}")]
    WalletNotFound(Username),

    /// Wallet already exists
    #[error("wallet already exists for {0}")]
    WalletAlreadyExists(Username),

    /// Duplicate transaction (idempotency key already used)
    #[error("duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// Invalid amount (must be positive)
    #[error("invalid amount: {0}")]
    InvalidAmount(Usd),

    /// Credit would overflow the balance
    #[error("balance overflow")]
    BalanceOverflow,
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
