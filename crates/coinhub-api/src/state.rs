//! Shared application state for axum handlers.

use coinhub_feed::PriceSource;
use coinhub_ledger::{PriceOracle, SavingsDesk, TransferDesk, WalletLedger};
use coinhub_store::MemoryStore;
use std::sync::Arc;

/// Everything handlers need, cheaply cloneable.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<MemoryStore>,
    pub source: Arc<dyn PriceSource>,
    pub oracle: Arc<PriceOracle>,
    pub wallet: Arc<WalletLedger>,
    pub transfers: Arc<TransferDesk>,
    pub savings: Arc<SavingsDesk>,
}

impl ApiState {
    /// Wire up the ledger components over a store and a price source.
    pub fn new(store: Arc<MemoryStore>, source: Arc<dyn PriceSource>) -> Self {
        let oracle = Arc::new(PriceOracle::new(Arc::clone(&store), Arc::clone(&source)));
        let wallet = Arc::new(WalletLedger::new(Arc::clone(&store), Arc::clone(&oracle)));
        let transfers = Arc::new(TransferDesk::new(Arc::clone(&store)));
        let savings = Arc::new(SavingsDesk::new(Arc::clone(&store)));

        Self {
            store,
            source,
            oracle,
            wallet,
            transfers,
            savings,
        }
    }
}
