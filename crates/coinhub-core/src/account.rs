//! Account: cash balance plus per-symbol coin holdings.
//!
//! The balance and wallet are mutated only through the methods here, which
//! enforce the non-negativity invariant: a mutation that would drive the
//! balance or a holding below zero is rejected before anything changes.
//! Callers persist the mutated account with an optimistic version check.

use crate::coin::CoinSymbol;
use crate::decimal::{Money, Quantity};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// A user account.
///
/// `version` counts committed mutations; the store rejects a write whose
/// expected version does not match, so concurrent read-modify-write
/// sequences on the same account serialize instead of losing updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Cash balance. Never negative.
    pub balance: Money,
    /// Held quantity per coin symbol. Entries are removed at exactly zero.
    #[serde(default)]
    pub wallet: HashMap<CoinSymbol, Quantity>,
    /// Optimistic concurrency counter, bumped on every committed mutation.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh account with zero balance and an empty wallet.
    pub fn new(email: &str, display_name: &str, role: Role) -> Self {
        Self {
            id: AccountId::new(),
            email: email.trim().to_ascii_lowercase(),
            display_name: display_name.trim().to_string(),
            role,
            balance: Money::ZERO,
            wallet: HashMap::new(),
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Held quantity for a symbol; zero when there is no entry.
    pub fn holding(&self, symbol: &CoinSymbol) -> Quantity {
        self.wallet.get(symbol).copied().unwrap_or(Quantity::ZERO)
    }

    /// Credit cash to the balance.
    pub fn credit(&mut self, amount: Money) -> Result<()> {
        if amount.is_negative() {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }
        self.balance = self.balance + amount;
        Ok(())
    }

    /// Debit cash from the balance; fails without mutating when the
    /// balance would go negative.
    pub fn debit(&mut self, amount: Money) -> Result<()> {
        if amount.is_negative() {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }
        match self.balance.checked_deduct(amount) {
            Some(remaining) => {
                self.balance = remaining;
                Ok(())
            }
            None => Err(CoreError::InsufficientBalance {
                have: self.balance.to_string(),
                need: amount.to_string(),
            }),
        }
    }

    /// Credit coin quantity to the wallet.
    pub fn credit_holding(&mut self, symbol: &CoinSymbol, qty: Quantity) -> Result<()> {
        if !qty.is_positive() {
            return Err(CoreError::InvalidAmount(qty.to_string()));
        }
        let updated = self.holding(symbol) + qty;
        self.wallet.insert(symbol.clone(), updated);
        Ok(())
    }

    /// Debit coin quantity from the wallet; the entry is removed when it
    /// reaches exactly zero. Fails without mutating when holdings are short.
    pub fn debit_holding(&mut self, symbol: &CoinSymbol, qty: Quantity) -> Result<()> {
        if !qty.is_positive() {
            return Err(CoreError::InvalidAmount(qty.to_string()));
        }
        let held = self.holding(symbol);
        if held < qty {
            return Err(CoreError::InsufficientHoldings {
                symbol: symbol.to_string(),
                have: held.to_string(),
                need: qty.to_string(),
            });
        }
        let remaining = held - qty;
        if remaining.is_zero() {
            self.wallet.remove(symbol);
        } else {
            self.wallet.insert(symbol.clone(), remaining);
        }
        Ok(())
    }
}
