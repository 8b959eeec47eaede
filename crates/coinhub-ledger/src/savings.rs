//! Savings registration: debit-then-record.

use crate::error::{LedgerError, LedgerResult};
use crate::retry::update_account;
use coinhub_core::{AccountId, Money, PlanId, Saving};
use coinhub_store::MemoryStore;
use std::sync::Arc;
use tracing::info;

/// Registers savings contracts against offered rate plans.
pub struct SavingsDesk {
    store: Arc<MemoryStore>,
}

impl SavingsDesk {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Register a saving: validate the plan terms, debit the amount,
    /// record the contract with a snapshot of the plan.
    pub fn register(
        &self,
        account_id: AccountId,
        plan_id: PlanId,
        amount: Money,
    ) -> LedgerResult<Saving> {
        if !amount.is_positive() {
            return Err(LedgerError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let plan = self.store.plan(plan_id)?;
        if amount < plan.min_amount {
            return Err(LedgerError::Validation(format!(
                "amount is below the plan minimum of {}",
                plan.min_amount
            )));
        }

        update_account(&self.store, account_id, |account| {
            account.debit(amount)?;
            Ok(())
        })?;

        let saving = self
            .store
            .insert_saving(Saving::register(account_id, &plan, amount));

        info!(
            saving = %saving.id,
            account = %account_id,
            plan = %plan.name,
            amount = %saving.amount,
            maturity = %saving.maturity_date,
            "Saving registered"
        );
        Ok(saving)
    }
}
