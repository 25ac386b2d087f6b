//! Wallet Ledger service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────────┐    ┌──────────────┐
//! │  Config  │───▶│ Gateway  │───▶│ WalletService │───▶│ LedgerStore  │
//! │  (YAML)  │    │  (axum)  │    │  (validation) │    │ (PG / memory)│
//! └──────────┘    └──────────┘    └───────────────┘    └──────────────┘
//! ```
//!
//! Usage: `wallet_ledger [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use wallet_ledger::config::{AppConfig, StorageBackend};
use wallet_ledger::db::Database;
use wallet_ledger::gateway::{self, state::AppState};
use wallet_ledger::logging::init_logging;
use wallet_ledger::wallet::{InMemoryLedgerStore, LedgerStore, PgLedgerStore, WalletService};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            if config.database.run_migrations {
                db.run_migrations()
                    .await
                    .context("Failed to run migrations")?;
            }
            Ok(Arc::new(PgLedgerStore::new(db.pool().clone())))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory ledger store; balances are lost on restart");
            Ok(Arc::new(InMemoryLedgerStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config =
        AppConfig::load(&env).with_context(|| format!("Failed to load config for env {}", env))?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = init_logging(&app_config);

    tracing::info!(
        "Starting Wallet Ledger ({}) in {} mode",
        env!("GIT_HASH"),
        env
    );

    let store = build_store(&app_config).await?;
    tracing::info!("Ledger store: {}", store.name());

    let wallet_service = Arc::new(WalletService::new(store));
    let state = Arc::new(AppState::new(wallet_service));

    gateway::run_server(&app_config.gateway, state)
        .await
        .context("Gateway server error")?;

    tracing::info!("Wallet Ledger stopped");
    Ok(())
}
