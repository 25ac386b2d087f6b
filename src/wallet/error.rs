//! Wallet error types
//!
//! `LedgerError` is what a store returns; `WalletError` is what the service
//! hands to the gateway. Callers branch on variants, never on message text.

use thiserror::Error;
use uuid::Uuid;

/// Ledger store failures
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Wallet not found: {0}")]
    NotFound(Uuid),

    #[error("Insufficient funds in wallet {wallet_id}: balance {balance}, delta {delta}")]
    InsufficientFunds {
        wallet_id: Uuid,
        balance: i64,
        delta: i64,
    },

    #[error("Balance overflow in wallet {0}")]
    BalanceOverflow(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Client-correctable request errors, raised before any storage access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("operation type must be DEPOSIT or WITHDRAW, got {0:?}")]
    UnknownOperationType(String),
}

/// Balance mutator outcomes
#[derive(Error, Debug)]
pub enum WalletError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Wallet not found: {0}")]
    NotFound(Uuid),

    #[error("Insufficient funds in wallet {0}")]
    InsufficientFunds(Uuid),

    #[error("Storage error: {0}")]
    Storage(LedgerError),
}

impl WalletError {
    /// Stable code for logs and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Validation(ValidationError::NonPositiveAmount) => "INVALID_AMOUNT",
            WalletError::Validation(ValidationError::UnknownOperationType(_)) => {
                "INVALID_OPERATION_TYPE"
            }
            WalletError::NotFound(_) => "WALLET_NOT_FOUND",
            WalletError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            WalletError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<LedgerError> for WalletError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(id) => WalletError::NotFound(id),
            LedgerError::InsufficientFunds { wallet_id, .. } => {
                WalletError::InsufficientFunds(wallet_id)
            }
            other => WalletError::Storage(other),
        }
    }
}
