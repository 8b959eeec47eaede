//! Interest-bearing savings contracts.
//!
//! A saving snapshots the rate plan terms at registration; later plan edits
//! do not change running contracts. The registration debit is applied by
//! the ledger ("debit-then-record", same as trades).

use crate::account::AccountId;
use crate::decimal::Money;
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique rate plan id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique saving id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavingId(pub Uuid);

impl SavingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SavingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SavingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An offered savings rate plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePlan {
    pub id: PlanId,
    pub name: String,
    /// Term length in months.
    pub term_months: u32,
    /// Annual interest rate as a fraction, e.g. 0.045 for 4.5%.
    pub annual_rate: Decimal,
    /// Minimum amount accepted for registration.
    pub min_amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RatePlan {
    pub fn new(name: &str, term_months: u32, annual_rate: Decimal, min_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: PlanId::new(),
            name: name.trim().to_string(),
            term_months,
            annual_rate,
            min_amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the terms a saving locks in at registration.
    pub fn terms(&self) -> PlanTerms {
        PlanTerms {
            name: self.name.clone(),
            term_months: self.term_months,
            annual_rate: self.annual_rate,
            min_amount: self.min_amount,
        }
    }
}

/// Rate plan terms frozen onto a saving at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTerms {
    pub name: String,
    pub term_months: u32,
    pub annual_rate: Decimal,
    pub min_amount: Money,
}

/// Lifecycle state of a saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingStatus {
    #[default]
    Active,
    Completed,
    Withdrawn,
}

impl fmt::Display for SavingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// A registered savings contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saving {
    pub id: SavingId,
    pub account_id: AccountId,
    pub plan_id: PlanId,
    pub terms: PlanTerms,
    pub amount: Money,
    pub start_date: DateTime<Utc>,
    pub maturity_date: DateTime<Utc>,
    pub status: SavingStatus,
}

impl Saving {
    /// Register a saving starting now, maturing `term_months` later.
    pub fn register(account_id: AccountId, plan: &RatePlan, amount: Money) -> Self {
        let start = Utc::now();
        let maturity = start
            .checked_add_months(Months::new(plan.term_months))
            .unwrap_or(start);
        Self {
            id: SavingId::new(),
            account_id,
            plan_id: plan.id,
            terms: plan.terms(),
            amount,
            start_date: start,
            maturity_date: maturity,
            status: SavingStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_register_snapshots_terms() {
        let plan = RatePlan::new("6M Fixed", 6, dec!(0.045), Money::new(dec!(1000)));
        let saving = Saving::register(AccountId::new(), &plan, Money::new(dec!(5000)));

        assert_eq!(saving.terms.name, "6M Fixed");
        assert_eq!(saving.terms.annual_rate, dec!(0.045));
        assert_eq!(saving.status, SavingStatus::Active);
    }

    #[test]
    fn test_maturity_is_term_months_out() {
        let plan = RatePlan::new("12M Fixed", 12, dec!(0.05), Money::new(dec!(100)));
        let saving = Saving::register(AccountId::new(), &plan, Money::new(dec!(100)));

        let elapsed = saving.maturity_date - saving.start_date;
        // 12 months is at least 365 days.
        assert!(elapsed.num_days() >= 365);
    }
}
