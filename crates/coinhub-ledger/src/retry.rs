//! Serialized account mutation via optimistic version retry.

use crate::error::{LedgerError, LedgerResult};
use coinhub_core::{Account, AccountId};
use coinhub_store::{MemoryStore, StoreError};
use tracing::trace;

/// Attempts before giving up on a contended account. Each attempt starts
/// from a fresh read and re-checks every precondition, so a retry can
/// never commit against stale state.
const MAX_ATTEMPTS: usize = 8;

/// Read-modify-write an account with the store's version check.
///
/// `apply` mutates a fresh copy of the account and is where callers
/// enforce their preconditions; an `Err` from it aborts immediately with
/// no write. A version conflict (someone else committed first) triggers
/// a re-read and a fresh attempt, up to the bound.
pub(crate) fn update_account<F>(
    store: &MemoryStore,
    id: AccountId,
    mut apply: F,
) -> LedgerResult<Account>
where
    F: FnMut(&mut Account) -> LedgerResult<()>,
{
    for attempt in 0..MAX_ATTEMPTS {
        let mut account = store
            .account(id)
            .map_err(|_| LedgerError::NotFound("account"))?;
        let expected = account.version;

        apply(&mut account)?;

        match store.replace_account(expected, account) {
            Ok(committed) => return Ok(committed),
            Err(StoreError::VersionConflict { .. }) => {
                trace!(%id, attempt, "Account version conflict, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(LedgerError::Contention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinhub_core::{Money, Role};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_precondition_failure_writes_nothing() {
        let store = MemoryStore::new();
        let account = store
            .insert_account(Account::new("a@example.com", "A", Role::User))
            .unwrap();

        let err = update_account(&store, account.id, |acc| {
            acc.debit(Money::new(dec!(1)))?;
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(store.account(account.id).unwrap().version, 0);
    }

    #[test]
    fn test_concurrent_updates_all_land() {
        let store = Arc::new(MemoryStore::new());
        let account = store
            .insert_account(Account::new("a@example.com", "A", Role::User))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = account.id;
                std::thread::spawn(move || {
                    update_account(&store, id, |acc| {
                        acc.credit(Money::new(dec!(10)))?;
                        Ok(())
                    })
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let final_state = store.account(account.id).unwrap();
        assert_eq!(final_state.balance, Money::new(dec!(80)));
        assert_eq!(final_state.version, 8);
    }
}
