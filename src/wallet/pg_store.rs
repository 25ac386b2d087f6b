//! PostgreSQL Ledger Store
//!
//! Wallets live in the `wallets` table. `apply_delta` locks the row with
//! `SELECT ... FOR UPDATE` and writes inside the same transaction, so two
//! mutations of one wallet can never interleave.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::LedgerError;
use super::models::Wallet;
use super::store::{LedgerStore, next_balance};

/// PostgreSQL-backed ledger store
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    fn name(&self) -> &'static str {
        "Postgres"
    }

    async fn create_if_absent(&self, wallet_id: Uuid) -> Result<(), LedgerError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO wallets (id, balance, created_at, updated_at)
            VALUES ($1, 0, $2, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(wallet_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!(wallet_id = %wallet_id, "Wallet provisioned");
        }
        Ok(())
    }

    async fn read(&self, wallet_id: Uuid) -> Result<Wallet, LedgerError> {
        let wallet: Option<Wallet> = sqlx::query_as(
            r#"SELECT id, balance, created_at, updated_at
               FROM wallets WHERE id = $1"#,
        )
        .bind(wallet_id)
        .fetch_optional(&self.pool)
        .await?;

        wallet.ok_or(LedgerError::NotFound(wallet_id))
    }

    async fn apply_delta(
        &self,
        wallet_id: Uuid,
        signed_delta: i64,
    ) -> Result<Wallet, LedgerError> {
        // Dropping `tx` without commit rolls back, which covers every early
        // return below as well as cancellation of this future.
        let mut tx = self.pool.begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1 FOR UPDATE")
                .bind(wallet_id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or(LedgerError::NotFound(wallet_id))?;

        let new_balance = match next_balance(wallet_id, current, signed_delta) {
            Ok(b) => b,
            Err(e) => {
                warn!(wallet_id = %wallet_id, balance = current, delta = signed_delta, error = %e, "Balance update rejected");
                // The outcome is already decided; a failed rollback only closes the connection
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(wallet_id = %wallet_id, error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        let wallet: Wallet = sqlx::query_as(
            r#"
            UPDATE wallets SET balance = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, balance, created_at, updated_at
            "#,
        )
        .bind(new_balance)
        .bind(Utc::now())
        .bind(wallet_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            wallet_id = %wallet_id,
            delta = signed_delta,
            balance = wallet.balance,
            "Balance updated"
        );
        Ok(wallet)
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, test_config};
    use std::sync::Arc;

    // Note: These tests require a running PostgreSQL instance
    // Connection settings come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME

    async fn setup() -> PgLedgerStore {
        let db = Database::connect(&test_config())
            .await
            .expect("Failed to connect");
        db.run_migrations().await.expect("Failed to migrate");
        PgLedgerStore::new(db.pool().clone())
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running
    async fn test_create_read_apply() {
        let store = setup().await;
        let id = Uuid::new_v4();

        assert!(matches!(store.read(id).await, Err(LedgerError::NotFound(_))));

        store.create_if_absent(id).await.unwrap();
        store.create_if_absent(id).await.unwrap();
        assert_eq!(store.read(id).await.unwrap().balance, 0);

        let wallet = store.apply_delta(id, 500).await.unwrap();
        assert_eq!(wallet.balance, 500);
        assert!(wallet.updated_at >= wallet.created_at);

        let wallet = store.apply_delta(id, -500).await.unwrap();
        assert_eq!(wallet.balance, 0);

        assert!(matches!(
            store.apply_delta(id, -1).await,
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(store.read(id).await.unwrap().balance, 0);
    }

    #[tokio::test]
    #[ignore]
    async fn test_apply_delta_unknown_wallet() {
        let store = setup().await;
        assert!(matches!(
            store.apply_delta(Uuid::new_v4(), 10).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_concurrent_deposits_no_lost_updates() {
        let store = Arc::new(setup().await);
        let id = Uuid::new_v4();
        store.create_if_absent(id).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.apply_delta(id, 10).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(store.read(id).await.unwrap().balance, 500);
    }

    #[tokio::test]
    #[ignore]
    async fn test_concurrent_create_if_absent() {
        let store = Arc::new(setup().await);
        let id = Uuid::new_v4();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_if_absent(id).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallets WHERE id = $1")
            .bind(id)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.read(id).await.unwrap().balance, 0);
    }
}
