//! Price oracle: listed symbol -> current delayed price.
//!
//! Every pricing path resolves the listed coin first and quotes against
//! its configured `feed_symbol`; the public ticker is never sent
//! upstream directly.

use crate::error::{LedgerError, LedgerResult};
use coinhub_core::{CoinSymbol, ListedCoin, Money};
use coinhub_feed::PriceSource;
use coinhub_store::MemoryStore;
use std::sync::Arc;
use tracing::debug;

/// Resolves listed symbols to current (delayed) trade prices.
pub struct PriceOracle {
    store: Arc<MemoryStore>,
    source: Arc<dyn PriceSource>,
}

impl PriceOracle {
    pub fn new(store: Arc<MemoryStore>, source: Arc<dyn PriceSource>) -> Self {
        Self { store, source }
    }

    /// Resolve a symbol to its listing, requiring it to be tradeable.
    pub fn resolve_active(&self, symbol: &CoinSymbol) -> LedgerResult<ListedCoin> {
        let coin = self
            .store
            .coin_by_symbol(symbol)
            .ok_or_else(|| LedgerError::CoinNotFound(symbol.clone()))?;
        if !coin.is_active {
            return Err(LedgerError::CoinInactive(symbol.clone()));
        }
        Ok(coin)
    }

    /// Current price for a listed symbol. Read-only; upstream failures
    /// surface as retryable errors, never as a stale price.
    pub async fn current_price(&self, symbol: &CoinSymbol) -> LedgerResult<Money> {
        let coin = self.resolve_active(symbol)?;
        self.price_of(&coin).await
    }

    /// Current price for an already-resolved listing.
    pub async fn price_of(&self, coin: &ListedCoin) -> LedgerResult<Money> {
        let price = self.source.latest_close(&coin.feed_symbol).await?;
        debug!(symbol = %coin.symbol, feed_symbol = %coin.feed_symbol, %price, "Resolved price");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinhub_feed::FixtureData;

    fn oracle_with(coins: Vec<ListedCoin>) -> PriceOracle {
        let store = Arc::new(MemoryStore::new());
        for coin in coins {
            store.insert_coin(coin).unwrap();
        }
        PriceOracle::new(store, Arc::new(FixtureData::default()))
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found() {
        let oracle = oracle_with(vec![]);
        let err = oracle
            .current_price(&CoinSymbol::new("BTCC"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::CoinNotFound(_)));
    }

    #[tokio::test]
    async fn test_inactive_symbol_is_invalid_state() {
        let mut coin = ListedCoin::new(CoinSymbol::new("BTCC"), "BTCUSDT", "Coinhub Bitcoin");
        coin.is_active = false;
        let oracle = oracle_with(vec![coin]);

        let err = oracle
            .current_price(&CoinSymbol::new("BTCC"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::CoinInactive(_)));
    }

    #[tokio::test]
    async fn test_active_symbol_has_price() {
        let coin = ListedCoin::new(CoinSymbol::new("BTCC"), "BTCUSDT", "Coinhub Bitcoin");
        let oracle = oracle_with(vec![coin]);

        let price = oracle.current_price(&CoinSymbol::new("BTCC")).await.unwrap();
        assert!(price.is_positive());
    }
}
