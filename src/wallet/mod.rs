//! Wallet ledger module
//!
//! - [`store`]: `LedgerStore` trait (create-if-absent, read, locked `apply_delta`)
//! - [`pg_store`]: PostgreSQL implementation (`SELECT ... FOR UPDATE`)
//! - [`memory_store`]: in-memory implementation (per-wallet async mutex)
//! - [`service`]: `WalletService`, the balance mutator

pub mod error;
pub mod memory_store;
pub mod models;
pub mod pg_store;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{LedgerError, ValidationError, WalletError};
pub use memory_store::InMemoryLedgerStore;
pub use models::{OperationType, Wallet, WalletOperationRequest};
pub use pg_store::PgLedgerStore;
pub use service::WalletService;
pub use store::LedgerStore;
