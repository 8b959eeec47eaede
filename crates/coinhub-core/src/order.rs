//! Executed trade records.

use crate::account::AccountId;
use crate::coin::CoinSymbol;
use crate::decimal::{Money, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Immutable record of one executed trade.
///
/// Written once when a trade settles; never updated or deleted.
/// `price` is the unit price snapshot at execution, `total = quantity * price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinOrder {
    pub id: OrderId,
    pub account_id: AccountId,
    pub symbol: CoinSymbol,
    /// Upstream feed ticker the price was quoted against.
    pub feed_symbol: String,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub price: Money,
    pub total: Money,
    /// Display name of the coin at execution time.
    pub coin_name: String,
    pub created_at: DateTime<Utc>,
}

impl CoinOrder {
    pub fn executed(
        account_id: AccountId,
        symbol: CoinSymbol,
        feed_symbol: &str,
        side: OrderSide,
        quantity: Quantity,
        price: Money,
        coin_name: &str,
    ) -> Self {
        Self {
            id: OrderId::new(),
            account_id,
            symbol,
            feed_symbol: feed_symbol.to_string(),
            side,
            quantity,
            price,
            total: quantity.value_at(price),
            coin_name: coin_name.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_is_quantity_times_price() {
        let order = CoinOrder::executed(
            AccountId::new(),
            CoinSymbol::new("BTCC"),
            "BTCUSDT",
            OrderSide::Buy,
            Quantity::new(dec!(0.5)),
            Money::new(dec!(43500.25)),
            "Coinhub Bitcoin",
        );

        assert_eq!(order.total, Money::new(dec!(21750.125)));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }
}
