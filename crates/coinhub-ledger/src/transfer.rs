//! Transfer approval state machine.
//!
//! pending -> approved | rejected, both terminal. The status transition
//! is an atomic compare-and-set against the freshest read, so a
//! concurrent approve/reject pair resolves to exactly one winner; the
//! loser fails with "not pending".
//!
//! Approval applies the balance effect *before* flipping the status and
//! compensates if the status CAS is lost, so a lost race never leaves
//! the balance changed. The withdraw check at creation time is advisory
//! only (the balance may move before review); the re-check at approval
//! time is the authoritative one.

use crate::error::{LedgerError, LedgerResult};
use crate::retry::update_account;
use coinhub_core::{
    AccountId, Money, Transfer, TransferId, TransferKind, TransferStatus,
};
use coinhub_store::{MemoryStore, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// Creates and reviews deposit/withdraw transfers.
pub struct TransferDesk {
    store: Arc<MemoryStore>,
}

impl TransferDesk {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Create a pending transfer, snapshotting the account's linked bank
    /// details onto the record.
    pub fn create(
        &self,
        account_id: AccountId,
        kind: TransferKind,
        amount: Money,
    ) -> LedgerResult<Transfer> {
        if !amount.is_positive() {
            return Err(LedgerError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let account = self
            .store
            .account(account_id)
            .map_err(|_| LedgerError::NotFound("account"))?;

        let bank = self
            .store
            .bank_link_by_account(account_id)
            .ok_or(LedgerError::NoBankLink)?;

        // Advisory point-in-time check; approval re-checks authoritatively.
        if kind == TransferKind::Withdraw && account.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                have: account.balance.to_string(),
                need: amount.to_string(),
            });
        }

        let transfer = self
            .store
            .insert_transfer(Transfer::pending(account_id, kind, amount, bank.details));

        info!(
            transfer = %transfer.id,
            account = %account_id,
            kind = %transfer.kind,
            amount = %transfer.amount,
            "Transfer created"
        );
        Ok(transfer)
    }

    /// Approve a pending transfer, applying its balance effect.
    pub fn approve(&self, id: TransferId, reviewer: AccountId) -> LedgerResult<Transfer> {
        let transfer = self.store.transfer(id)?;
        if transfer.status != TransferStatus::Pending {
            return Err(LedgerError::TransferNotPending(transfer.status));
        }

        // Balance first. For withdraw this is the authoritative funds
        // check; a shortfall aborts with the transfer still pending.
        update_account(&self.store, transfer.account_id, |account| {
            match transfer.kind {
                TransferKind::Deposit => account.credit(transfer.amount)?,
                TransferKind::Withdraw => account.debit(transfer.amount)?,
            }
            Ok(())
        })?;

        // Now race for the terminal status. Losing means a concurrent
        // reviewer resolved the transfer first: undo our balance effect.
        match self
            .store
            .transfer_cas_status(id, TransferStatus::Pending, |t| {
                t.reviewed(TransferStatus::Approved, reviewer)
            }) {
            Ok(approved) => {
                info!(
                    transfer = %approved.id,
                    reviewer = %reviewer,
                    kind = %approved.kind,
                    amount = %approved.amount,
                    "Transfer approved"
                );
                Ok(approved)
            }
            Err(StoreError::StatusConflict { actual }) => {
                self.compensate(&transfer);
                Err(LedgerError::TransferNotPending(actual))
            }
            Err(e) => {
                self.compensate(&transfer);
                Err(e.into())
            }
        }
    }

    /// Reject a pending transfer. No balance effect.
    pub fn reject(&self, id: TransferId, reviewer: AccountId) -> LedgerResult<Transfer> {
        let transfer = self.store.transfer(id)?;
        if transfer.status != TransferStatus::Pending {
            return Err(LedgerError::TransferNotPending(transfer.status));
        }

        let rejected = self
            .store
            .transfer_cas_status(id, TransferStatus::Pending, |t| {
                t.reviewed(TransferStatus::Rejected, reviewer)
            })?;

        info!(transfer = %rejected.id, reviewer = %reviewer, "Transfer rejected");
        Ok(rejected)
    }

    /// Undo the balance effect of an approval that lost the status race.
    fn compensate(&self, transfer: &Transfer) {
        let result = update_account(&self.store, transfer.account_id, |account| {
            match transfer.kind {
                TransferKind::Deposit => account.debit(transfer.amount)?,
                TransferKind::Withdraw => account.credit(transfer.amount)?,
            }
            Ok(())
        });

        if let Err(e) = result {
            // Leaves the balance inconsistent with the transfer record;
            // needs operator attention.
            warn!(
                transfer = %transfer.id,
                account = %transfer.account_id,
                error = %e,
                "Failed to compensate lost approval race"
            );
        }
    }
}
