//! Store error types.

use coinhub_core::TransferStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the requested id.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A unique constraint was violated on create/update.
    #[error("Duplicate {0}")]
    Duplicate(&'static str),

    /// Optimistic version check failed: another writer committed first.
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// Conditional status transition found a different current status.
    #[error("Status conflict: transfer is {actual}")]
    StatusConflict { actual: TransferStatus },
}

pub type StoreResult<T> = Result<T, StoreError>;
