//! Wallet ledger: buy/sell execution against the delayed price.
//!
//! A trade is one logical operation: resolve the listing, snapshot the
//! price, mutate the account under the version check, then append the
//! immutable order record. Every precondition is checked before any
//! write; a failure leaves no side effects.

use crate::error::{LedgerError, LedgerResult};
use crate::oracle::PriceOracle;
use crate::retry::update_account;
use coinhub_core::{AccountId, CoinOrder, CoinSymbol, Money, OrderSide, Quantity};
use coinhub_store::MemoryStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Executes trades and answers wallet valuation queries.
pub struct WalletLedger {
    store: Arc<MemoryStore>,
    oracle: Arc<PriceOracle>,
}

/// One priced holding in a wallet view.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingView {
    pub symbol: CoinSymbol,
    pub coin_name: String,
    pub quantity: Quantity,
    pub current_price: Money,
    pub value: Money,
}

/// Account balance plus holdings valued at current delayed prices.
#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    pub balance: Money,
    pub holdings: Vec<HoldingView>,
    pub total_holdings_value: Money,
}

impl WalletLedger {
    pub fn new(store: Arc<MemoryStore>, oracle: Arc<PriceOracle>) -> Self {
        Self { store, oracle }
    }

    /// Execute a buy or sell of `quantity` units of `symbol`.
    pub async fn trade(
        &self,
        account_id: AccountId,
        symbol: &CoinSymbol,
        side: OrderSide,
        quantity: Quantity,
    ) -> LedgerResult<CoinOrder> {
        if !quantity.is_positive() {
            return Err(LedgerError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let coin = self.oracle.resolve_active(symbol)?;
        // Price snapshot for the whole operation; retries reuse it so the
        // executed order matches what the account was charged.
        let price = self.oracle.price_of(&coin).await?;
        let total = quantity.value_at(price);

        update_account(&self.store, account_id, |account| {
            match side {
                OrderSide::Buy => {
                    account.debit(total)?;
                    account.credit_holding(&coin.symbol, quantity)?;
                }
                OrderSide::Sell => {
                    account.debit_holding(&coin.symbol, quantity)?;
                    account.credit(total)?;
                }
            }
            Ok(())
        })?;

        let order = self.store.insert_order(CoinOrder::executed(
            account_id,
            coin.symbol.clone(),
            &coin.feed_symbol,
            side,
            quantity,
            price,
            &coin.name,
        ));

        info!(
            account = %account_id,
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            total = %order.total,
            "Trade executed"
        );
        Ok(order)
    }

    /// Balance and holdings valued at current delayed prices.
    ///
    /// Holdings whose listing has been delisted are omitted from the view;
    /// the quantities stay on the account.
    pub async fn wallet_view(&self, account_id: AccountId) -> LedgerResult<WalletView> {
        let account = self
            .store
            .account(account_id)
            .map_err(|_| LedgerError::NotFound("account"))?;

        let mut holdings = Vec::with_capacity(account.wallet.len());
        let mut total = Money::ZERO;

        let mut entries: Vec<_> = account.wallet.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (symbol, &quantity) in entries {
            let Some(coin) = self.store.coin_by_symbol(symbol) else {
                continue;
            };
            let price = self.oracle.price_of(&coin).await?;
            let value = quantity.value_at(price);
            total = total + value;
            holdings.push(HoldingView {
                symbol: symbol.clone(),
                coin_name: coin.name,
                quantity,
                current_price: price,
                value,
            });
        }

        Ok(WalletView {
            balance: account.balance,
            holdings,
            total_holdings_value: total,
        })
    }
}
