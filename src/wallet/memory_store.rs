//! In-memory Ledger Store
//!
//! One async mutex per wallet. The map shard lock is only held long enough to
//! clone the wallet's `Arc`, so waiting on one wallet never blocks another.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::error::LedgerError;
use super::models::Wallet;
use super::store::{LedgerStore, next_balance};

#[derive(Default)]
pub struct InMemoryLedgerStore {
    wallets: DashMap<Uuid, Arc<Mutex<Wallet>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of provisioned wallets
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    fn slot(&self, wallet_id: Uuid) -> Result<Arc<Mutex<Wallet>>, LedgerError> {
        self.wallets
            .get(&wallet_id)
            .map(|entry| entry.value().clone())
            .ok_or(LedgerError::NotFound(wallet_id))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    fn name(&self) -> &'static str {
        "InMemory"
    }

    async fn create_if_absent(&self, wallet_id: Uuid) -> Result<(), LedgerError> {
        self.wallets.entry(wallet_id).or_insert_with(|| {
            debug!(wallet_id = %wallet_id, "Wallet provisioned");
            Arc::new(Mutex::new(Wallet::new(wallet_id)))
        });
        Ok(())
    }

    async fn read(&self, wallet_id: Uuid) -> Result<Wallet, LedgerError> {
        let slot = self.slot(wallet_id)?;
        let wallet = slot.lock().await;
        Ok(wallet.clone())
    }

    async fn apply_delta(
        &self,
        wallet_id: Uuid,
        signed_delta: i64,
    ) -> Result<Wallet, LedgerError> {
        let slot = self.slot(wallet_id)?;
        let mut wallet = slot.lock().await;

        // No await from here on: the check and the write happen together or not at all.
        wallet.balance = next_balance(wallet_id, wallet.balance, signed_delta)?;
        wallet.updated_at = Utc::now();

        debug!(
            wallet_id = %wallet_id,
            delta = signed_delta,
            balance = wallet.balance,
            "Balance updated"
        );
        Ok(wallet.clone())
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[tokio::test]
    async fn test_read_unknown_wallet() {
        let store = InMemoryLedgerStore::new();
        assert!(matches!(
            store.read(Uuid::new_v4()).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_if_absent_is_idempotent() {
        let store = InMemoryLedgerStore::new();
        let id = Uuid::new_v4();
        store.create_if_absent(id).await.unwrap();
        store.apply_delta(id, 70).await.unwrap();

        // A second create must not reset the balance
        store.create_if_absent(id).await.unwrap();
        assert_eq!(store.read(id).await.unwrap().balance, 70);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_delta_updates_timestamp() {
        let store = InMemoryLedgerStore::new();
        let id = Uuid::new_v4();
        store.create_if_absent(id).await.unwrap();
        let before = store.read(id).await.unwrap();

        let after = store.apply_delta(id, 1).await.unwrap();
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_wallet_untouched() {
        let store = InMemoryLedgerStore::new();
        let id = Uuid::new_v4();
        store.create_if_absent(id).await.unwrap();
        store.apply_delta(id, 500).await.unwrap();
        let before = store.read(id).await.unwrap();

        assert!(matches!(
            store.apply_delta(id, -501).await,
            Err(LedgerError::InsufficientFunds { balance: 500, .. })
        ));
        assert_eq!(store.read(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_apply_delta_unknown_wallet() {
        let store = InMemoryLedgerStore::new();
        assert!(matches!(
            store.apply_delta(Uuid::new_v4(), 10).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deltas_no_lost_updates() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let id = Uuid::new_v4();
        store.create_if_absent(id).await.unwrap();

        let tasks = (0..200).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let delta = if i % 2 == 0 { 3 } else { 7 };
                store.apply_delta(id, delta).await
            })
        });
        for r in join_all(tasks).await {
            r.unwrap().unwrap();
        }

        assert_eq!(store.read(id).await.unwrap().balance, 100 * 3 + 100 * 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_if_absent_single_wallet() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let id = Uuid::new_v4();

        let tasks = (0..32).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.create_if_absent(id).await })
        });
        for r in join_all(tasks).await {
            r.unwrap().unwrap();
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.read(id).await.unwrap().balance, 0);
    }

    #[tokio::test]
    async fn test_locked_wallet_does_not_block_others() {
        let store = InMemoryLedgerStore::new();
        let busy = Uuid::new_v4();
        let free = Uuid::new_v4();
        store.create_if_absent(busy).await.unwrap();
        store.create_if_absent(free).await.unwrap();

        let slot = store.slot(busy).unwrap();
        let _held = slot.lock().await;

        let wallet = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            store.apply_delta(free, 5),
        )
        .await
        .expect("other wallet must not wait on the held lock")
        .unwrap();
        assert_eq!(wallet.balance, 5);
    }
}
