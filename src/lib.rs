//! Wallet Ledger
//!
//! Deposit/withdraw ledger over HTTP. Concurrent operations on one wallet are
//! serialized by an exclusive per-wallet lock, so balances never lose updates
//! and never go negative.
//!
//! # Modules
//!
//! - [`wallet`] - Ledger stores and the balance mutator (`WalletService`)
//! - [`gateway`] - axum HTTP boundary and error mapping
//! - [`db`] - PostgreSQL pool and migrations
//! - [`config`] - YAML configuration with env overrides
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod wallet;

// Convenient re-exports at crate root
pub use config::{AppConfig, StorageBackend};
pub use db::Database;
pub use gateway::{build_router, run_server, state::AppState};
pub use wallet::{
    InMemoryLedgerStore, LedgerError, LedgerStore, OperationType, PgLedgerStore, ValidationError,
    Wallet, WalletError, WalletOperationRequest, WalletService,
};
