//! Ledger Store
//!
//! Durable keyed storage of wallet balances with per-wallet exclusive locking.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::LedgerError;
use super::models::Wallet;

/// Ledger store trait
///
/// Implementations must make `apply_delta` a single unit of work: lock the
/// wallet, read, check, write, release. Calls on the same wallet are
/// serialized; calls on different wallets must not block each other.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Get store name for logging
    fn name(&self) -> &'static str;

    /// Insert a zero-balance wallet unless one already exists.
    ///
    /// Concurrent callers for the same id all succeed and leave exactly one row.
    async fn create_if_absent(&self, wallet_id: Uuid) -> Result<(), LedgerError>;

    /// Point lookup without locking
    async fn read(&self, wallet_id: Uuid) -> Result<Wallet, LedgerError>;

    /// Add `signed_delta` to the balance under the wallet's exclusive lock.
    ///
    /// Fails with `InsufficientFunds` and leaves the row untouched when the
    /// result would be negative.
    async fn apply_delta(&self, wallet_id: Uuid, signed_delta: i64)
    -> Result<Wallet, LedgerError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), LedgerError>;
}

/// Balance arithmetic shared by every store: `current + delta`, rejecting
/// overflow and negative results.
pub(crate) fn next_balance(
    wallet_id: Uuid,
    current: i64,
    signed_delta: i64,
) -> Result<i64, LedgerError> {
    let new_balance = current
        .checked_add(signed_delta)
        .ok_or(LedgerError::BalanceOverflow(wallet_id))?;
    if new_balance < 0 {
        return Err(LedgerError::InsufficientFunds {
            wallet_id,
            balance: current,
            delta: signed_delta,
        });
    }
    Ok(new_balance)
}
