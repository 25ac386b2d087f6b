use std::sync::Arc;

use crate::wallet::WalletService;

/// Gateway shared state, built once at startup
#[derive(Clone)]
pub struct AppState {
    /// Balance mutator backed by the configured ledger store
    pub wallet_service: Arc<WalletService>,
}

impl AppState {
    pub fn new(wallet_service: Arc<WalletService>) -> Self {
        Self { wallet_service }
    }
}
