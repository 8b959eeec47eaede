//! Linked bank accounts.

use crate::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique bank link id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankLinkId(pub Uuid);

impl BankLinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BankLinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BankLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination bank details.
///
/// Snapshotted onto every transfer at creation so later edits to the link
/// do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub bank_number: String,
    pub holder_name: String,
}

/// A bank account linked to a user account. At most one per account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankLink {
    pub id: BankLinkId,
    pub account_id: AccountId,
    #[serde(flatten)]
    pub details: BankDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BankLink {
    pub fn new(account_id: AccountId, details: BankDetails) -> Self {
        let now = Utc::now();
        Self {
            id: BankLinkId::new(),
            account_id,
            details,
            created_at: now,
            updated_at: now,
        }
    }
}
