//! Balance Mutator
//!
//! Business rules on top of a [`LedgerStore`]: positive amounts, known
//! operation types, provisioning on first use. The no-negative-balance check
//! itself stays inside `apply_delta` so it is never split from the write.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::error::{LedgerError, ValidationError, WalletError};
use super::models::{OperationType, WalletOperationRequest};
use super::store::LedgerStore;

pub struct WalletService {
    store: Arc<dyn LedgerStore>,
}

impl WalletService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Apply a deposit or withdrawal.
    ///
    /// Validation runs before any store access. Unknown wallets are created
    /// with a zero balance first.
    pub async fn process_operation(&self, req: WalletOperationRequest) -> Result<(), WalletError> {
        if req.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        let operation_type: OperationType = req.operation_type.parse()?;
        let wallet_id = req.wallet_id;

        match self.store.read(wallet_id).await {
            Ok(_) => {}
            Err(LedgerError::NotFound(_)) => {
                debug!(wallet_id = %wallet_id, "Unknown wallet, provisioning");
                self.store
                    .create_if_absent(wallet_id)
                    .await
                    .map_err(WalletError::Storage)?;
            }
            Err(e) => return Err(WalletError::Storage(e)),
        }

        let signed_delta = operation_type.signed_delta(req.amount);
        let wallet = self
            .store
            .apply_delta(wallet_id, signed_delta)
            .await
            .map_err(|e| match e {
                LedgerError::InsufficientFunds { wallet_id, .. } => {
                    WalletError::InsufficientFunds(wallet_id)
                }
                other => WalletError::Storage(other),
            })?;

        info!(
            wallet_id = %wallet_id,
            operation = %operation_type,
            amount = req.amount,
            balance = wallet.balance,
            "Wallet operation applied"
        );
        Ok(())
    }

    /// Current balance; `NotFound` for wallets never used
    pub async fn get_balance(&self, wallet_id: Uuid) -> Result<i64, WalletError> {
        let wallet = self.store.read(wallet_id).await?;
        Ok(wallet.balance)
    }

    pub async fn health_check(&self) -> Result<(), WalletError> {
        self.store.health_check().await.map_err(WalletError::Storage)
    }
}
