//! Deposit/withdraw requests with an approval lifecycle.
//!
//! A transfer is created `Pending` and transitions exactly once to
//! `Approved` or `Rejected`; both are terminal. The balance effect of an
//! approval is applied by the ledger, not here.

use crate::account::AccountId;
use crate::bank::BankDetails;
use crate::decimal::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique transfer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub Uuid);

impl TransferId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Lifecycle state of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A deposit or withdraw request awaiting admin review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub account_id: AccountId,
    pub kind: TransferKind,
    pub amount: Money,
    /// Destination bank details snapshotted at creation.
    #[serde(flatten)]
    pub bank: BankDetails,
    pub status: TransferStatus,
    /// Admin who approved or rejected; set together with `reviewed_at`.
    pub reviewed_by: Option<AccountId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    pub fn pending(
        account_id: AccountId,
        kind: TransferKind,
        amount: Money,
        bank: BankDetails,
    ) -> Self {
        Self {
            id: TransferId::new(),
            account_id,
            kind,
            amount,
            bank,
            status: TransferStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Stamp a terminal review decision onto the record.
    pub fn reviewed(mut self, status: TransferStatus, reviewer: AccountId) -> Self {
        self.status = status;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(Utc::now());
        self
    }
}
