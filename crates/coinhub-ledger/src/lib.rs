//! Balance mutation core for coinhub.
//!
//! Three mutation paths share one account document and serialize through
//! the store's optimistic version check:
//! - `WalletLedger`: buy/sell against the delayed oracle price
//! - `TransferDesk`: deposit/withdraw approval state machine
//! - `SavingsDesk`: savings registration (debit-then-record)
//!
//! `PriceOracle` is the read-only companion that resolves listed symbols
//! to delayed prices. All failures flow through [`LedgerError`], whose
//! [`ErrorKind`] drives the stable HTTP status/code mapping.

pub mod error;
pub mod oracle;
mod retry;
pub mod savings;
pub mod transfer;
pub mod wallet;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use oracle::PriceOracle;
pub use savings::SavingsDesk;
pub use transfer::TransferDesk;
pub use wallet::{HoldingView, WalletLedger, WalletView};
