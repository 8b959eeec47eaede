//! Ledger error taxonomy.
//!
//! Every failure a core operation can produce, as a typed union. The
//! HTTP layer maps each [`ErrorKind`] to one stable status/code pair, so
//! API consumers can branch on the kind (insufficient funds vs. not
//! pending are distinguishable) instead of parsing messages.

use coinhub_core::{CoinSymbol, CoreError, TransferStatus};
use coinhub_feed::FeedError;
use coinhub_store::StoreError;
use thiserror::Error;

/// Classification of a ledger failure, used for API status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown account/coin/order/transfer/plan id.
    NotFound,
    /// Precondition on entity state failed: inactive coin, non-pending
    /// transfer, missing bank link.
    InvalidState,
    /// Cash balance short of the required amount.
    InsufficientFunds,
    /// Coin holdings short of the required quantity.
    InsufficientHoldings,
    /// Upstream price feed failure; retryable.
    Upstream,
    /// Malformed or out-of-range input.
    Validation,
    /// Account update contention not resolved within the retry bound;
    /// retryable.
    Conflict,
}

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Coin not found: {0}")]
    CoinNotFound(CoinSymbol),

    #[error("Coin is not active: {0}")]
    CoinInactive(CoinSymbol),

    #[error("Transfer is not pending (status: {0})")]
    TransferNotPending(TransferStatus),

    #[error("No linked bank account")]
    NoBankLink,

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientFunds { have: String, need: String },

    #[error("Insufficient holdings of {symbol}: have {have}, need {need}")]
    InsufficientHoldings {
        symbol: String,
        have: String,
        need: String,
    },

    #[error("{0} already taken")]
    Duplicate(&'static str),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Account update contention, please retry")]
    Contention,
}

impl LedgerError {
    /// Kind used for the stable API status/code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::CoinNotFound(_) => ErrorKind::NotFound,
            Self::CoinInactive(_) | Self::TransferNotPending(_) | Self::NoBankLink => {
                ErrorKind::InvalidState
            }
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientHoldings { .. } => ErrorKind::InsufficientHoldings,
            Self::Feed(_) => ErrorKind::Upstream,
            Self::Duplicate(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::Contention => ErrorKind::Conflict,
        }
    }

    /// Whether the caller may safely retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Upstream | ErrorKind::Conflict)
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => Self::NotFound(entity),
            StoreError::Duplicate(field) => Self::Duplicate(field),
            StoreError::VersionConflict { .. } => Self::Contention,
            StoreError::StatusConflict { actual } => Self::TransferNotPending(actual),
        }
    }
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientBalance { have, need } => {
                Self::InsufficientFunds { have, need }
            }
            CoreError::InsufficientHoldings { symbol, have, need } => Self::InsufficientHoldings {
                symbol,
                have,
                need,
            },
            CoreError::InvalidAmount(msg) => Self::Validation(format!("invalid amount: {msg}")),
            CoreError::InvalidSymbol(msg) => Self::Validation(format!("invalid symbol: {msg}")),
            CoreError::DecimalParse(e) => Self::Validation(e.to_string()),
        }
    }
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
