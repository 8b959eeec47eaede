//! Core domain types for the coinhub backend.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `Money`, `Quantity`: precision-safe numeric types
//! - `Account`: cash balance plus per-symbol coin holdings
//! - `ListedCoin`: a locally listed ticker mapped to an upstream feed symbol
//! - `CoinOrder`: immutable record of an executed buy/sell
//! - `Transfer`: deposit/withdraw request with an approval lifecycle
//! - `Candle`: one OHLCV bar of upstream market data

pub mod account;
pub mod bank;
pub mod candle;
pub mod coin;
pub mod decimal;
pub mod error;
pub mod order;
pub mod saving;
pub mod transfer;

pub use account::{Account, AccountId, Role};
pub use bank::{BankDetails, BankLink, BankLinkId};
pub use candle::Candle;
pub use coin::{CoinId, CoinSymbol, ListedCoin};
pub use decimal::{Money, Quantity};
pub use error::{CoreError, Result};
pub use order::{CoinOrder, OrderId, OrderSide};
pub use saving::{PlanId, PlanTerms, RatePlan, Saving, SavingId, SavingStatus};
pub use transfer::{Transfer, TransferId, TransferKind, TransferStatus};
